use std::cell::RefCell;
use std::rc::Rc;

use quill_runtime::{
    call, get_index, iterate, resolve_path, unpack, LookupFailure, Namespace, Object, Path,
    RuntimeError, Value,
};

/// Records every member lookup into a shared log and fails on `missing`.
#[derive(Debug, Default)]
struct Recorder {
    seen: Rc<RefCell<Vec<String>>>,
}

impl Object for Recorder {
    fn type_name(&self) -> &str {
        "recorder"
    }

    fn get_attr(&self, name: &str) -> Result<Value, RuntimeError> {
        self.seen.borrow_mut().push(name.to_string());
        if name == "missing" {
            Err(RuntimeError::raised("recorder has no `missing`"))
        } else {
            Ok(Value::object(Recorder {
                seen: Rc::clone(&self.seen),
            }))
        }
    }
}

/// Keyed for `theme`, member for `version`, and a fresh child map per access.
#[derive(Debug)]
struct Settings;

impl Object for Settings {
    fn type_name(&self) -> &str {
        "settings"
    }

    fn get_key(&self, name: &str) -> Option<Value> {
        (name == "theme").then(|| Value::bytes("dark"))
    }

    fn get_attr(&self, name: &str) -> Result<Value, RuntimeError> {
        match name {
            "version" => Ok(Value::Int(3)),
            "child" => Ok(Value::map([("leaf", Value::Int(5))])),
            "shout" => Ok(Value::function("shout", |args, _| {
                let word = args.first().cloned().unwrap_or_default();
                Ok(Value::text(format!("{}!", quill_runtime::format_value(&word)?)))
            })),
            _ => Err(LookupFailure::MissingAttribute {
                type_name: "settings".to_string(),
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn get_item(&self, index: &Value) -> Result<Value, RuntimeError> {
        match index {
            Value::Int(n) => Ok(Value::Int(n * 10)),
            other => Err(RuntimeError::raised(format!(
                "settings cannot be indexed by {}",
                other.type_name()
            ))),
        }
    }

    fn iterate(&self) -> Option<Result<Vec<Value>, RuntimeError>> {
        Some(Ok(vec![Value::bytes("theme"), Value::bytes("version")]))
    }
}

/// Answers `label` both as a key and as a member, with different values.
#[derive(Debug)]
struct Labelled;

impl Object for Labelled {
    fn type_name(&self) -> &str {
        "labelled"
    }

    fn get_key(&self, name: &str) -> Option<Value> {
        (name == "label").then(|| Value::bytes("from key"))
    }

    fn get_attr(&self, name: &str) -> Result<Value, RuntimeError> {
        match name {
            "label" => Ok(Value::bytes("from member")),
            _ => Err(RuntimeError::raised(format!("no member `{name}`"))),
        }
    }
}

// ---------------------------------------------------------------------------
// resolve_path
// ---------------------------------------------------------------------------

#[test]
fn empty_path_returns_base() {
    let base = Value::object(Settings);
    let resolved = resolve_path::<&str>(&base, &[]).unwrap();
    match (&base, &resolved) {
        (Value::Object(a), Value::Object(b)) => assert!(Rc::ptr_eq(a, b)),
        _ => panic!("expected the same object back"),
    }
}

#[test]
fn keyed_path_adds_exactly_one_reference() {
    let leaf = Rc::new(vec![Value::Int(1)]);
    let base = Value::map([(
        "a",
        Value::map([("b", Value::List(Rc::clone(&leaf)))]),
    )]);
    assert_eq!(Rc::strong_count(&leaf), 2);
    let resolved = resolve_path(&base, &["a", "b"]).unwrap();
    assert_eq!(Rc::strong_count(&leaf), 3);
    drop(resolved);
    assert_eq!(Rc::strong_count(&leaf), 2);
}

#[test]
fn member_lookup_is_the_fallback() {
    let base = Value::object(Settings);
    assert!(matches!(resolve_path(&base, &["theme"]), Ok(Value::Bytes(b)) if &b[..] == b"dark"));
    assert!(matches!(resolve_path(&base, &["version"]), Ok(Value::Int(3))));
}

#[test]
fn map_keys_shadow_builtin_members() {
    let base = Value::map([("items", Value::Int(9))]);
    assert!(matches!(resolve_path(&base, &["items"]), Ok(Value::Int(9))));

    let without = Value::map([("other", Value::Int(9))]);
    assert!(matches!(resolve_path(&without, &["items"]), Ok(Value::Function(_))));
}

#[test]
fn object_keys_shadow_members() {
    let base = Value::object(Labelled);
    let found = resolve_path(&base, &["label"]).unwrap();
    assert!(matches!(found, Value::Bytes(b) if &b[..] == b"from key"));
}

#[test]
fn member_results_stay_alive_for_the_rest_of_the_walk() {
    let base = Value::object(Settings);
    assert!(matches!(resolve_path(&base, &["child", "leaf"]), Ok(Value::Int(5))));
}

#[test]
fn failure_stops_the_walk() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let base = Value::object(Recorder {
        seen: Rc::clone(&seen),
    });
    let err = resolve_path(&base, &["first", "missing", "after"]).unwrap_err();
    assert_eq!(err, RuntimeError::raised("recorder has no `missing`"));
    assert_eq!(*seen.borrow(), ["first", "missing"]);
}

#[test]
fn non_object_members_fail_with_type_name() {
    let base = Value::map([("count", Value::Int(2))]);
    assert_eq!(
        resolve_path(&base, &["count", "real"]).unwrap_err(),
        RuntimeError::Lookup(LookupFailure::MissingAttribute {
            type_name: "int".to_string(),
            name: "real".to_string(),
        })
    );
}

#[test]
fn builtin_members_resolve_on_maps() {
    let base = Value::map([("x", Value::Int(1))]);
    let keys = resolve_path(&base, &["keys"]).unwrap();
    let listed = call(&keys, &[], &[]).unwrap();
    assert_eq!(quill_runtime::format_value(&listed).unwrap(), "['x']");
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

#[test]
fn namespace_resolves_dotted_paths() {
    let ns = Namespace::new()
        .with("settings", Value::object(Settings))
        .unwrap();
    let found = ns.resolve(&Path::parse("settings.child.leaf")).unwrap();
    assert!(matches!(found, Value::Int(5)));
}

#[test]
fn namespace_reports_missing_names() {
    let ns = Namespace::new();
    assert_eq!(
        ns.resolve(&Path::parse("nope.deeper")).unwrap_err(),
        RuntimeError::Lookup(LookupFailure::MissingName {
            name: "nope".to_string()
        })
    );
}

#[test]
fn object_roots_use_keyed_lookup() {
    let ns = Namespace::from_value(Value::object(Settings));
    assert!(matches!(ns.lookup("theme"), Ok(Value::Bytes(_))));
    assert!(matches!(
        ns.lookup("version"),
        Err(RuntimeError::Lookup(LookupFailure::MissingName { .. }))
    ));
}

// ---------------------------------------------------------------------------
// get_index / iterate / call
// ---------------------------------------------------------------------------

#[test]
fn index_wraps_and_bounds_checks() {
    let list = Value::list(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
    assert!(matches!(get_index(&list, &Value::Int(-1)), Ok(Value::Int(30))));
    assert!(matches!(get_index(&list, &Value::Int(-3)), Ok(Value::Int(10))));
    assert_eq!(
        get_index(&list, &Value::Int(5)).unwrap_err(),
        RuntimeError::IndexOutOfRange { index: 5, len: 3 }
    );
}

#[test]
fn index_defers_to_objects() {
    let settings = Value::object(Settings);
    assert!(matches!(get_index(&settings, &Value::Int(4)), Ok(Value::Int(40))));
    assert!(matches!(
        get_index(&settings, &Value::None),
        Err(RuntimeError::Raised(_))
    ));
}

#[test]
fn objects_iterate_and_unpack() {
    let settings = Value::object(Settings);
    assert_eq!(iterate(&settings).unwrap().len(), 2);
    assert!(unpack(&settings, 2).is_ok());
    assert_eq!(
        unpack(&settings, 1).unwrap_err(),
        RuntimeError::SequenceArity {
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn nested_unpacking() {
    let row = Value::tuple(vec![
        Value::Int(1),
        Value::tuple(vec![Value::bytes("a"), Value::bytes("b")]),
    ]);
    let outer = unpack(&row, 2).unwrap();
    let inner = unpack(&outer[1], 2).unwrap();
    assert!(matches!(&inner[1], Value::Bytes(b) if &b[..] == b"b"));
}

#[test]
fn member_functions_are_callable() {
    let shout = resolve_path(&Value::object(Settings), &["shout"]).unwrap();
    let result = call(&shout, &[Value::bytes("hey")], &[]).unwrap();
    assert!(matches!(result, Value::Text(t) if &*t == "hey!"));
}
