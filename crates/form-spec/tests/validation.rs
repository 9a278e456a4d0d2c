use serde_json::json;

use form_spec::{
    BasicTranslator, Dispatched, DynamicForm, EngineError, FieldInput, FieldValue,
    FormCallbacks, FormConfiguration, FormData, FormEvent, FormPatch, MissingFields, StepFlags,
    adapters::TextUi, check_config, missing_required, translate::params,
};

#[derive(Default)]
struct Recorder {
    patches: Vec<FormPatch>,
    next_calls: usize,
    previous_calls: usize,
    errors: Vec<String>,
}

impl FormCallbacks for Recorder {
    fn on_data_change(&mut self, patch: FormPatch) {
        self.patches.push(patch);
    }

    fn on_next(&mut self) {
        self.next_calls += 1;
    }

    fn on_previous(&mut self) {
        self.previous_calls += 1;
    }

    fn on_validation_error(&mut self, error: &MissingFields) {
        self.errors.push(error.message.clone());
    }
}

fn email_form() -> FormConfiguration {
    serde_json::from_value(json!({
        "id": "contact",
        "templateName": "contact",
        "steps": [{
            "id": "contact",
            "title": "Contact",
            "description": "",
            "fields": [
                { "name": "email", "type": "input", "label": "Email address", "required": true },
                { "name": "note", "type": "textarea", "label": "Note", "required": false }
            ]
        }]
    }))
    .expect("config")
}

fn two_step_form() -> FormConfiguration {
    serde_json::from_value(json!({
        "id": "two",
        "templateName": "two",
        "steps": [
            {
                "id": "first",
                "title": "First",
                "description": "",
                "fields": [
                    { "name": "name", "type": "input", "label": "Name", "required": true },
                    {
                        "name": "size",
                        "type": "select",
                        "label": "Size",
                        "required": false,
                        "options": [
                            { "value": "s", "label": "Small" },
                            { "value": "l", "label": "Large" }
                        ]
                    }
                ]
            },
            {
                "id": "second",
                "title": "Second",
                "description": "",
                "fields": [
                    { "name": "tags", "type": "tags", "label": "Tags", "required": true },
                    { "name": "agree", "type": "checkbox", "label": "Agree", "required": true }
                ]
            }
        ]
    }))
    .expect("config")
}

#[test]
fn missing_required_field_blocks_next() {
    let config = email_form();
    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let mut recorder = Recorder::default();

    let empty = FormData::new();
    let form = DynamicForm::new(&config, 0, &empty, StepFlags::for_position(0, 1), &ui, &translator)
        .expect("form");
    let error = form.submit(&mut recorder).expect_err("blocked");

    assert_eq!(recorder.next_calls, 0);
    assert_eq!(error.fields, vec!["email"]);
    assert!(error.message.contains("Email address"));
    assert_eq!(
        error.message,
        "Please fill in all required fields: Email address"
    );
    assert_eq!(recorder.errors, vec![error.message.clone()]);

    let mut filled = FormData::new();
    filled.insert("email", "a@b.com");
    let form = DynamicForm::new(&config, 0, &filled, StepFlags::for_position(0, 1), &ui, &translator)
        .expect("form");
    form.submit(&mut recorder).expect("submitted");
    assert_eq!(recorder.next_calls, 1);
}

#[test]
fn validation_is_scoped_to_active_step() {
    let config = two_step_form();
    let mut data = FormData::new();
    data.insert("name", "Ada");

    assert!(missing_required(&config.steps[0], &data).is_empty());
    let second: Vec<_> = missing_required(&config.steps[1], &data)
        .into_iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(second, vec!["tags", "agree"]);

    let mut later = FormData::new();
    later.insert("tags", FieldValue::Tags(vec!["x".into()]));
    later.insert("agree", true);
    assert!(missing_required(&config.steps[1], &later).is_empty());
    assert_eq!(missing_required(&config.steps[0], &later).len(), 1);

    // tags and agree are required on step 1 and still empty in `data`
    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let mut recorder = Recorder::default();
    let form = DynamicForm::new(&config, 0, &data, StepFlags::for_position(0, 2), &ui, &translator)
        .expect("form");
    form.submit(&mut recorder).expect("step 0 submits");
    assert_eq!(recorder.next_calls, 1);
    assert!(recorder.errors.is_empty());
}

#[test]
fn empty_list_and_false_count_as_missing() {
    let config = two_step_form();
    let mut data = FormData::new();
    data.insert("tags", FieldValue::Tags(Vec::new()));
    data.insert("agree", false);

    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let form = DynamicForm::new(&config, 1, &data, StepFlags::for_position(1, 2), &ui, &translator)
        .expect("form");
    let error = form.validate().expect_err("missing");
    assert_eq!(error.labels, vec!["Tags", "Agree"]);
    assert_eq!(error.message, "Please fill in all required fields: Tags, Agree");
}

#[test]
fn error_template_is_translated() {
    let config = email_form();
    let catalog = params([
        ("Email address", "E-Mail"),
        ("Please fill in all required fields: {fields}", "Bitte ausfüllen: {fields}"),
    ]);
    let translator = BasicTranslator::with_catalog(catalog);
    let ui = TextUi::default();
    let data = FormData::new();
    let form = DynamicForm::new(&config, 0, &data, StepFlags::default(), &ui, &translator)
        .expect("form");

    let error = form.validate().expect_err("missing");
    assert_eq!(error.message, "Bitte ausfüllen: E-Mail");
    assert_eq!(error.to_string(), error.message);
}

#[test]
fn change_produces_single_field_patch() {
    let config = two_step_form();
    let mut data = FormData::new();
    data.insert("name", "Ada");
    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let mut recorder = Recorder::default();

    let form = DynamicForm::new(&config, 0, &data, StepFlags::for_position(0, 2), &ui, &translator)
        .expect("form");
    let changed = form
        .change("size", FieldInput::Text("l".into()), &mut recorder)
        .expect("known field");

    assert!(changed);
    assert_eq!(recorder.patches.len(), 1);
    let patch = &recorder.patches[0];
    assert_eq!(patch.len(), 1);
    assert_eq!(patch.get("size"), Some(&FieldValue::Text("l".into())));
    assert!(patch.get("name").is_none());
}

#[test]
fn dispatch_routes_events() {
    let config = two_step_form();
    let data = FormData::new();
    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let mut recorder = Recorder::default();
    let form = DynamicForm::new(&config, 1, &data, StepFlags::for_position(1, 2), &ui, &translator)
        .expect("form");

    let outcome = form
        .dispatch(
            FormEvent::Input {
                field: "tags".into(),
                input: FieldInput::Text("a, ,b, c".into()),
            },
            &mut recorder,
        )
        .expect("dispatch");
    assert_eq!(outcome, Dispatched::Changed);
    assert_eq!(
        recorder.patches[0].get("tags"),
        Some(&FieldValue::Tags(vec!["a".into(), "b".into(), "c".into()]))
    );

    let ignored = form
        .dispatch(
            FormEvent::Input {
                field: "agree".into(),
                input: FieldInput::Text("yes".into()),
            },
            &mut recorder,
        )
        .expect("dispatch");
    assert_eq!(ignored, Dispatched::Ignored);
    assert_eq!(recorder.patches.len(), 1);

    let previous = form.dispatch(FormEvent::Previous, &mut recorder).expect("dispatch");
    assert_eq!(previous, Dispatched::Previous);
    assert_eq!(recorder.previous_calls, 1);

    let blocked = form.dispatch(FormEvent::Submit, &mut recorder).expect("dispatch");
    assert!(matches!(blocked, Dispatched::Blocked(ref error) if error.step_id == "second"));
    assert_eq!(recorder.next_calls, 0);
}

#[test]
fn change_rejects_fields_outside_active_step() {
    let config = two_step_form();
    let data = FormData::new();
    let ui = TextUi::default();
    let translator = BasicTranslator::new();
    let mut recorder = Recorder::default();
    let form = DynamicForm::new(&config, 0, &data, StepFlags::for_position(0, 2), &ui, &translator)
        .expect("form");

    let result = form.change("tags", FieldInput::Text("a".into()), &mut recorder);
    assert_eq!(
        result,
        Err(EngineError::UnknownField {
            step: "first".into(),
            field: "tags".into(),
        })
    );
    assert!(recorder.patches.is_empty());
}

#[test]
fn check_config_reports_permissive_issues() {
    let config: FormConfiguration = serde_json::from_value(json!({
        "id": "lint",
        "templateName": "lint",
        "steps": [
            {
                "id": "a",
                "title": "A",
                "description": "",
                "fields": [
                    { "name": "kind", "type": "select", "label": "Kind", "required": true },
                    { "name": "kind", "type": "input", "label": "Kind again", "rows": 3 },
                    { "name": "stars", "type": "rating", "label": "Stars" }
                ]
            },
            { "id": "a", "title": "Empty", "description": "", "fields": [] }
        ]
    }))
    .expect("config");

    let codes: Vec<_> = check_config(&config)
        .into_iter()
        .map(|issue| issue.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            "missing_options",
            "duplicate_field",
            "rows_ignored",
            "unknown_type",
            "duplicate_step_id",
            "empty_step",
        ]
    );
}

#[test]
fn clean_config_has_no_issues() {
    assert!(check_config(&two_step_form()).is_empty());
}
