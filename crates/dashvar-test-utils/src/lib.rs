//! Testing utilities for the dashvar workspace
//!
//! Shared fixtures, proptest strategies and a recording observer.

#![allow(missing_docs)]

use std::cell::RefCell;
use std::rc::Rc;

use dashvar_editor::{EditorConfig, EditorError, EditorEvent, EditorObserver, VariableCollectionEditor};
use dashvar_model::{
    CustomConfig, QueryConfig, Variable, VariableCollection, VariableConfig, VariableKind,
    VariableName,
};
use proptest::prelude::*;

pub fn name(s: &str) -> VariableName {
    VariableName::new(s).unwrap()
}

pub fn query_variable(n: &str, query: &str) -> Variable {
    Variable::new(
        name(n),
        VariableConfig::Query(QueryConfig {
            query: query.to_string(),
            ..QueryConfig::default()
        }),
    )
}

pub fn custom_variable(n: &str, values: &str) -> Variable {
    Variable::new(name(n), VariableConfig::Custom(CustomConfig::new(values)))
}

pub fn variable_of_kind(n: &str, kind: VariableKind) -> Variable {
    Variable::of_kind(name(n), kind)
}

/// `[query0, custom1, textbox2, filters]`, the last one ad-hoc
pub fn sample_collection() -> VariableCollection {
    VariableCollection::from_variables(vec![
        query_variable("query0", "label_values(up, job)"),
        custom_variable("custom1", "dev,staging,prod").with_label("Environment"),
        variable_of_kind("textbox2", VariableKind::Textbox),
        variable_of_kind("filters", VariableKind::AdHoc),
    ])
    .unwrap()
}

pub fn collection_of(names: &[&str]) -> VariableCollection {
    VariableCollection::from_variables(names.iter().map(|n| variable_of_kind(n, VariableKind::Query)))
        .unwrap()
}

pub fn names_of<O: EditorObserver>(editor: &VariableCollectionEditor<O>) -> Vec<String> {
    editor.list().iter().map(|v| v.name().to_string()).collect()
}

pub fn sample_editor() -> VariableCollectionEditor {
    VariableCollectionEditor::new(sample_collection())
}

pub fn editor_with_config(config: EditorConfig) -> VariableCollectionEditor {
    VariableCollectionEditor::with_config(sample_collection(), config).unwrap()
}

/// Editor over [`sample_collection`] with a [`RecordingObserver`] attached
pub fn recorded_editor() -> (VariableCollectionEditor<RecordingObserver>, RecordingObserver) {
    let recorder = RecordingObserver::default();
    let editor = sample_editor().with_observer(recorder.clone());
    (editor, recorder)
}

/// Observer that keeps every notification; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    errors: Rc<RefCell<Vec<EditorError>>>,
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl RecordingObserver {
    pub fn errors(&self) -> Vec<EditorError> {
        self.errors.borrow().clone()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.errors.borrow_mut().clear();
        self.events.borrow_mut().clear();
    }
}

impl EditorObserver for RecordingObserver {
    fn on_error(&self, error: &EditorError) {
        self.errors.borrow_mut().push(error.clone());
    }

    fn on_event(&self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

pub fn arb_kind() -> impl Strategy<Value = VariableKind> {
    prop::sample::select(VariableKind::ALL.to_vec())
}

pub fn arb_name() -> impl Strategy<Value = VariableName> {
    "[a-z][a-z0-9_]{0,7}".prop_map(|s| name(&s))
}

/// Collection of up to `max` variables with distinct names
pub fn arb_collection(max: usize) -> impl Strategy<Value = VariableCollection> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,7}", 0..=max)
        .prop_flat_map(|names| {
            let names: Vec<String> = names.into_iter().collect();
            let len = names.len();
            (Just(names), prop::collection::vec(arb_kind(), len))
        })
        .prop_map(|(names, kinds)| {
            VariableCollection::from_variables(
                names
                    .iter()
                    .zip(kinds)
                    .map(|(n, kind)| variable_of_kind(n, kind)),
            )
            .unwrap()
        })
}
