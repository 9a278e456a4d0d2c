use serde_json::{Value, json};

use form_spec::{
    Action, BasicTranslator, EngineError, FieldValue, FormConfiguration, FormData, FormText,
    Node, Overrides, Region, StepFlags, create_host_translation_adapter, render_form,
    adapters::{JsonUi, TextUi, node_to_json, node_to_text},
    translate::flatten_messages,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "project_form" => include_str!("../tests/fixtures/project_form.json"),
        "messages" => include_str!("../tests/fixtures/messages.en.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn project_form() -> FormConfiguration {
    serde_json::from_str(fixture("project_form")).expect("deserialize")
}

fn render_json(config: &FormConfiguration, step: usize, data: &FormData) -> Value {
    let flags = StepFlags::for_position(step, config.step_count());
    let node = render_form(
        config,
        step,
        data,
        flags,
        &JsonUi::default(),
        &BasicTranslator::new(),
        None,
        None,
    )
    .expect("render");
    node_to_json(&node)
}

fn regions(value: &Value) -> Vec<String> {
    value["children"]
        .as_array()
        .expect("children")
        .iter()
        .map(|child| child["region"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn render_is_idempotent() {
    let config = project_form();
    let data: FormData = serde_json::from_value(json!({
        "projectName": "demo",
        "projectType": "cli"
    }))
    .expect("data");

    assert_eq!(render_json(&config, 0, &data), render_json(&config, 0, &data));
    assert_eq!(render_json(&config, 1, &data), render_json(&config, 1, &data));
}

#[test]
fn step_composes_progress_header_fields_buttons() {
    let config = project_form();
    let ui = render_json(&config, 0, &FormData::new());

    assert_eq!(ui["region"], "form");
    assert_eq!(regions(&ui), vec!["progress", "header", "fields", "buttons"]);

    let progress = &ui["children"][0]["children"][0];
    assert_eq!(progress["currentStep"], 1);
    assert_eq!(progress["totalSteps"], 2);

    let header = &ui["children"][1];
    assert_eq!(header["children"][0]["children"][0]["text"], "form.basics.title");

    let fields = ui["children"][2]["children"].as_array().expect("fields");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0]["children"][0]["for"], "projectName");
    assert_eq!(fields[1]["children"][0]["for"], "summary");
    assert_eq!(fields[2]["children"][0]["for"], "projectType");
}

#[test]
fn textarea_uses_configured_rows() {
    let config = project_form();
    let ui = render_json(&config, 0, &FormData::new());
    let textarea = &ui["children"][2]["children"][1]["children"][1]["children"][0];
    assert_eq!(textarea["type"], "textarea");
    assert_eq!(textarea["rows"], 6);
}

#[test]
fn progress_is_omitted_without_capability() {
    let config = project_form();
    let node = render_form(
        &config,
        0,
        &FormData::new(),
        StepFlags::for_position(0, 2),
        &JsonUi {
            hide_progress: true,
        },
        &BasicTranslator::new(),
        None,
        None,
    )
    .expect("render");

    assert!(node.find_region(Region::Progress).is_none());
    assert!(node.find_region(Region::Header).is_some());
}

#[test]
fn navigation_labels_follow_position_flags() {
    let config = project_form();

    let first = render_json(&config, 0, &FormData::new());
    let buttons = &first["children"][3]["children"];
    assert_eq!(buttons[0]["label"], "Back");
    assert_eq!(buttons[0]["disabled"], true);
    assert_eq!(buttons[0]["onClick"]["action"], "previous");
    assert_eq!(buttons[1]["label"], "Next");
    assert_eq!(buttons[1]["buttonType"], "submit");

    let last = render_json(&config, 1, &FormData::new());
    let buttons = &last["children"][3]["children"];
    assert_eq!(buttons[0]["label"], "Previous");
    assert_eq!(buttons[0]["disabled"], false);
    assert_eq!(buttons[1]["label"], "Submit");
}

#[test]
fn host_decides_first_and_last() {
    let config = project_form();
    let flags = StepFlags {
        is_first_step: false,
        is_last_step: true,
    };
    let node = render_form(
        &config,
        0,
        &FormData::new(),
        flags,
        &TextUi::default(),
        &BasicTranslator::new(),
        None,
        None,
    )
    .expect("render");
    let buttons = node.find_region(Region::Buttons).expect("buttons");
    assert_eq!(node_to_text(buttons), "<Previous>  <Submit>");
}

#[test]
fn overrides_replace_default_renderers() {
    let config = project_form();
    let overrides: Overrides<String> = Overrides::new()
        .previous_button(|action, is_first| {
            assert_eq!(action, Action::Previous);
            Node::text(format!("custom-previous first={is_first}"))
        })
        .next_button(|action, is_last| {
            assert_eq!(action, Action::Submit);
            Node::text(format!("custom-next last={is_last}"))
        })
        .progress(|current, total| Some(Node::text(format!("{current} of {total}"))));

    let node = render_form(
        &config,
        1,
        &FormData::new(),
        StepFlags::for_position(1, 2),
        &TextUi::default(),
        &BasicTranslator::new(),
        None,
        Some(&overrides),
    )
    .expect("render");

    let progress = node.find_region(Region::Progress).expect("progress");
    assert_eq!(progress.plain_text(), "2 of 2");
    let buttons = node.find_region(Region::Buttons).expect("buttons");
    assert_eq!(
        node_to_text(buttons),
        "custom-previous first=false  custom-next last=true"
    );
}

#[test]
fn progress_override_returning_none_hides_region() {
    let config = project_form();
    let overrides: Overrides<String> = Overrides::new().progress(|_, _| None);
    let node = render_form(
        &config,
        0,
        &FormData::new(),
        StepFlags::for_position(0, 2),
        &TextUi::default(),
        &BasicTranslator::new(),
        None,
        Some(&overrides),
    )
    .expect("render");
    assert!(node.find_region(Region::Progress).is_none());
}

#[test]
fn host_translations_resolve_every_visible_string() {
    let config = project_form();
    let messages: Value = serde_json::from_str(fixture("messages")).expect("messages");
    let translator =
        create_host_translation_adapter(Some(flatten_messages(&messages))).expect("translator");

    let node = render_form(
        &config,
        0,
        &FormData::new(),
        StepFlags::for_position(0, 2),
        &TextUi::default(),
        &translator,
        None,
        None,
    )
    .expect("render");
    let text = node_to_text(&node);

    assert!(text.contains("== Project basics =="));
    assert!(text.contains("Tell us about the project."));
    assert!(text.contains("Project name *"));
    assert!(text.contains("Summary (optional)"));
    assert!(text.contains("[ <my-app> ] P"));
    assert!(text.contains("One or two sentences."));
    assert!(text.contains("Web application = web"));
    assert!(!text.contains("form.fields"));
}

#[test]
fn custom_text_changes_navigation_labels() {
    let config = project_form();
    let text: FormText = serde_json::from_value(json!({
        "buttonTexts": { "back": "Cancel", "next": "Continue" }
    }))
    .expect("text");
    let node = render_form(
        &config,
        0,
        &FormData::new(),
        StepFlags::for_position(0, 2),
        &TextUi::default(),
        &BasicTranslator::new(),
        Some(&text),
        None,
    )
    .expect("render");
    let buttons = node.find_region(Region::Buttons).expect("buttons");
    assert_eq!(node_to_text(buttons), "(Cancel)  <Continue>");
}

#[test]
fn tags_display_as_comma_separated_text() {
    let config = project_form();
    let mut data = FormData::new();
    data.insert("techStack", FieldValue::Tags(vec!["a".into(), "b".into()]));

    let ui = render_json(&config, 1, &data);
    let tags_input = &ui["children"][2]["children"][0]["children"][1]["children"][0];
    assert_eq!(tags_input["type"], "input");
    assert_eq!(tags_input["value"], "a, b");
    assert_eq!(tags_input["onChange"]["field"], "techStack");
}

#[test]
fn empty_step_renders_without_fields() {
    let config: FormConfiguration = serde_json::from_value(json!({
        "id": "empty",
        "templateName": "t",
        "steps": [{ "id": "only", "title": "Only", "description": "", "fields": [] }]
    }))
    .expect("config");

    let ui = render_json(&config, 0, &FormData::new());
    assert_eq!(ui["children"][2]["children"], json!([]));
    let buttons = &ui["children"][3]["children"];
    assert_eq!(buttons[0]["label"], "Back");
    assert_eq!(buttons[1]["label"], "Submit");
}

#[test]
fn out_of_range_step_is_rejected() {
    let config = project_form();
    let result = render_form(
        &config,
        5,
        &FormData::new(),
        StepFlags::default(),
        &TextUi::default(),
        &BasicTranslator::new(),
        None,
        None,
    );
    assert_eq!(
        result.err(),
        Some(EngineError::StepOutOfRange { index: 5, count: 2 })
    );
}

#[test]
fn maximum_step_index_is_rejected_without_overflow() {
    let config = project_form();
    let flags = StepFlags::for_position(usize::MAX, config.step_count());
    assert!(flags.is_last_step);
    assert!(!flags.is_first_step);

    let result = render_form(
        &config,
        usize::MAX,
        &FormData::new(),
        flags,
        &TextUi::default(),
        &BasicTranslator::new(),
        None,
        None,
    );
    assert_eq!(
        result.err(),
        Some(EngineError::StepOutOfRange {
            index: usize::MAX,
            count: 2
        })
    );
}
