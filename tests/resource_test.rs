use resource_recipe::memory::{MemoryAdapter, MemoryError, Record};
use resource_recipe::{
    Action, Attribute, AttributeKind, ModelNamespace, Operation, Params, Resource, ResourceError,
    ResourceOptions, ResourceRegistry, RouteOn, RouteShape, Translator, Vars,
};
use std::sync::Arc;

// --- Fixtures ---

struct Widget;
struct Setting;

fn namespace() -> Arc<ModelNamespace> {
    let mut namespace = ModelNamespace::new();
    namespace
        .register_type::<Widget>("Widget")
        .register_type::<Setting>("Setting");
    Arc::new(namespace)
}

fn widget_adapter() -> MemoryAdapter {
    MemoryAdapter::with_records(vec![
        Record::new(1).with("name", "Sprocket"),
        Record::new(2).with("name", "Bolt"),
    ])
    .attributes(vec![
        Attribute::new("id", AttributeKind::Integer),
        Attribute::new("name", AttributeKind::String),
    ])
}

fn widgets(configure: impl FnOnce(&mut resource_recipe::ResourceBuilder<MemoryAdapter>)) -> Resource<MemoryAdapter> {
    Resource::build("widgets", |b| {
        b.namespace(namespace()).adapter(widget_adapter());
        configure(b);
    })
    .unwrap()
}

/// Echoes the key and every variable, so tests can see what reached the host.
struct EchoTranslator;

impl Translator for EchoTranslator {
    fn translate(&self, key: &str, vars: &Vars) -> String {
        let vars: Vec<String> = vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{key}[{}]", vars.join(","))
    }
}

// --- Actions ---

#[test]
fn test_actions_full_and_readonly() {
    let full = widgets(|_| {});
    assert_eq!(full.actions(), &Action::ALL);

    let readonly = widgets(|b| {
        b.readonly(true);
    });
    assert_eq!(readonly.actions(), &[Action::Index, Action::Show]);
}

#[test]
fn test_root_action() {
    assert_eq!(widgets(|_| {}).root_action(), Action::Index);

    let setting = Resource::<MemoryAdapter>::build("setting", |b| {
        b.singular(true)
            .find_instance(|_, _, _| Box::pin(async { Ok(Some(Record::new(1))) }));
    })
    .unwrap();
    assert_eq!(setting.root_action(), Action::Show);
}

// --- Dispatch ---

#[tokio::test]
async fn test_override_replaces_adapter_call() {
    let adapter = widget_adapter();
    let calls = adapter.calls();
    let resource = Resource::<MemoryAdapter>::build("widgets", |b| {
        b.adapter(adapter).collection(|_, _| {
            Box::pin(async { Ok(vec![Record::new(42).with("name", "Override")]) })
        });
    })
    .unwrap();

    let collection = resource.collection(&Params::new()).await.unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].id, 42);
    assert_eq!(calls.count(Operation::Collection), 0);

    // Non-overridden operations still reach the adapter.
    assert_eq!(resource.count(&collection).await.unwrap(), 1);
    assert_eq!(calls.count(Operation::Count), 1);
}

#[tokio::test]
async fn test_override_receives_resource_context() {
    let resource = widgets(|b| {
        b.collection(|resource, params| {
            Box::pin(async move {
                let name = format!("{}:{}", resource.name(), params.get("q").unwrap_or(""));
                Ok(vec![Record::new(1).with("name", name)])
            })
        });
    });

    let collection = resource
        .collection(&Params::new().with("q", "bolt"))
        .await
        .unwrap();
    assert_eq!(collection[0].get("name"), Some("widgets:bolt"));
}

#[test]
fn test_last_override_wins() {
    let resource = widgets(|b| {
        b.to_param(|_, _| Ok("first".to_string()))
            .to_param(|_, r| Ok(format!("widget-{}", r.id)));
    });

    assert_eq!(resource.to_param(&Record::new(7)).unwrap(), "widget-7");
    assert_eq!(resource.overrides().overridden(), vec![Operation::ToParam]);
}

#[tokio::test]
async fn test_override_error_tagged_with_operation() {
    let resource = widgets(|b| {
        b.collection(|_, _| Box::pin(async { Err(MemoryError::Missing(9)) }));
    });

    let err = resource.collection(&Params::new()).await.unwrap_err();
    assert_eq!(err.operation(), Some(Operation::Collection));
    assert!(err.to_string().contains("Record not found: 9"));
}

#[test]
fn test_adapter_error_tagged_with_operation() {
    let resource = widgets(|_| {});
    let err = resource.human_attribute_name("colour").unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Adapter {
            operation: Operation::HumanAttributeName,
            ..
        }
    ));
}

#[tokio::test]
async fn test_find_instance_not_found() {
    let resource = widgets(|_| {});

    let found = resource.find_instance("2", &Params::new()).await.unwrap();
    assert_eq!(found.get("name"), Some("Bolt"));

    let err = resource.find_instance("99", &Params::new()).await.unwrap_err();
    match err {
        ResourceError::InstanceNotFound { resource, id } => {
            assert_eq!(resource, "widgets");
            assert_eq!(id, "99");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// --- Adapter lifecycle ---

#[test]
fn test_adapter_shared_across_threads() {
    let resource = Resource::<MemoryAdapter>::build("widgets", |_| {}).unwrap();

    let handles: Vec<_> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|_| s.spawn(|| resource.adapter().calls()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for calls in &handles {
        assert!(Arc::ptr_eq(calls, &handles[0]));
    }
    assert!(std::ptr::eq(resource.adapter(), resource.adapter()));
}

#[tokio::test]
async fn test_explicit_adapter_is_used() {
    let adapter = widget_adapter();
    let calls = adapter.calls();
    let resource = Resource::<MemoryAdapter>::build("widgets", |b| {
        b.adapter(adapter);
    })
    .unwrap();

    resource.collection(&Params::new()).await.unwrap();
    assert_eq!(calls.count(Operation::Collection), 1);
}

// --- Validation ---

#[test]
fn test_singular_requires_find_instance() {
    let err = Resource::<MemoryAdapter>::build("setting", |b| {
        b.singular(true);
    })
    .unwrap_err();
    assert!(matches!(err, ResourceError::Configuration(_)));
    assert!(err.to_string().contains("find_instance"));

    let ok = Resource::<MemoryAdapter>::build("setting", |b| {
        b.singular(true)
            .find_instance(|_, _, _| Box::pin(async { Ok(Some(Record::new(1))) }));
    });
    assert!(ok.is_ok());
}

// --- Model naming and translation ---

#[test]
fn test_model_inferred_from_resource_name() {
    let resource = widgets(|_| {});
    let model = resource.model().unwrap();
    assert!(model.is::<Widget>());
    assert_eq!(resource.model_name().unwrap().plural(), "widgets");
}

#[test]
fn test_model_not_found_names_expected_model() {
    let resource = Resource::<MemoryAdapter>::build("widgets", |_| {}).unwrap();
    let err = resource.model().unwrap_err();

    let message = err.to_string();
    assert!(message.contains("`Widget`"));
    assert!(message.contains("`widgets`"));
    assert!(matches!(err, ResourceError::ModelNotFound { .. }));
}

#[test]
fn test_explicit_model_skips_inference() {
    let resource = Resource::<MemoryAdapter>::build("stock_items", |b| {
        b.model("Widget").namespace(namespace());
    })
    .unwrap();
    assert!(resource.model().unwrap().is::<Widget>());
}

#[test]
fn test_translate_merges_model_name_vars() {
    let resource = widgets(|b| {
        b.translator(EchoTranslator);
    });

    let mut vars = Vars::new();
    vars.insert("count".into(), "3".into());
    vars.insert("model_name".into(), "ignored".into());

    let translated = resource.translate("admin.title", &vars).unwrap();
    assert_eq!(
        translated,
        "admin.title[count=3,lowercase_model_name=widget,model_name=Widget,pluralized_model_name=Widgets]"
    );
}

#[test]
fn test_default_translator_interpolates_default() {
    let resource = widgets(|_| {});
    let mut vars = Vars::new();
    vars.insert("default".into(), "New %{lowercase_model_name}".into());

    assert_eq!(resource.translate("admin.new", &vars).unwrap(), "New widget");
    assert_eq!(resource.translate("admin.new", &Vars::new()).unwrap(), "admin.new");
}

// --- Paths ---

#[test]
fn test_instance_path_plural_uses_to_param() {
    let resource = widgets(|_| {});
    let bolt = Record::new(2);

    assert_eq!(resource.instance_path(&bolt, None).unwrap(), "/admin/widgets/2");
    assert_eq!(
        resource.instance_path(&bolt, Some(Action::Edit)).unwrap(),
        "/admin/widgets/2/edit"
    );
    assert_eq!(resource.path(Action::New, None), "/admin/widgets/new");
}

#[test]
fn test_instance_path_singular_has_no_id() {
    let setting = Resource::<MemoryAdapter>::build("setting", |b| {
        b.singular(true)
            .mount("/backend/")
            .find_instance(|_, _, _| Box::pin(async { Ok(Some(Record::new(1))) }));
    })
    .unwrap();
    let calls = setting.adapter().calls();

    let instance = Record::new(1);
    assert_eq!(setting.instance_path(&instance, None).unwrap(), "/backend/setting");
    assert_eq!(
        setting.instance_path(&instance, Some(Action::Edit)).unwrap(),
        "/backend/setting/edit"
    );
    assert_eq!(calls.count(Operation::ToParam), 0);
}

#[test]
fn test_custom_path_segment() {
    let resource = widgets(|b| {
        b.path("products");
    });
    assert_eq!(resource.path(Action::Index, None), "/admin/products");
    assert_eq!(resource.routes().path.as_deref(), Some("products"));
}

#[test]
fn test_return_location() {
    let resource = widgets(|b| {
        b.return_to(Action::Update, |resource, instance| match instance {
            Some(instance) => resource.path(Action::Show, Some(&instance.id.to_string())),
            None => resource.path(Action::Index, None),
        });
    });

    assert_eq!(
        resource.return_location(Action::Update, Some(&Record::new(5))),
        Some("/admin/widgets/5".to_string())
    );
    assert_eq!(resource.return_location(Action::Create, None), None);
}

// --- Routes ---

#[test]
fn test_routes_full_resource() {
    let routes = widgets(|_| {}).routes();

    assert_eq!(routes.name, "widgets");
    assert_eq!(routes.shape, RouteShape::Plural);
    assert_eq!(routes.controller, "widgets_admin/admin");
    assert_eq!(routes.alias, "widgets_admin");
    assert!(routes.except.is_empty());
    assert!(routes.nested.is_empty());
}

#[test]
fn test_routes_readonly_excludes_write_actions() {
    let routes = widgets(|b| {
        b.readonly(true);
    })
    .routes();

    assert_eq!(
        routes.except,
        vec![
            Action::New,
            Action::Create,
            Action::Edit,
            Action::Update,
            Action::Destroy
        ]
    );
}

#[test]
fn test_routes_singular_with_additional_routes() {
    let setting = Resource::<MemoryAdapter>::build("setting", |b| {
        b.singular(true)
            .find_instance(|_, _, _| Box::pin(async { Ok(Some(Record::new(1))) }))
            .additional_routes(|routes| {
                routes.member(|m| {
                    m.post("reset", "reset");
                });
                routes.get("history", "history");
            });
    })
    .unwrap();

    let routes = setting.routes();
    assert_eq!(routes.shape, RouteShape::Singular);
    assert_eq!(routes.nested.len(), 2);
    assert_eq!(routes.nested[0].action, "reset");
    assert_eq!(routes.nested[0].on, RouteOn::Member);
    assert_eq!(routes.nested[1].on, RouteOn::Collection);
}

#[test]
fn test_route_descriptor_serializes() {
    let json = serde_json::to_value(widgets(|b| {
        b.readonly(true);
    })
    .routes())
    .unwrap();

    assert_eq!(json["shape"], "resources");
    assert_eq!(json["as"], "widgets_admin");
    assert_eq!(json["except"][0], "new");
}

// --- Options ---

#[test]
fn test_options_from_configuration() {
    let options: ResourceOptions = serde_json::from_str(
        r#"{ "readonly": true, "path": "catalog", "pagination": { "per_page": 10 } }"#,
    )
    .unwrap();
    assert_eq!(options.mount, "admin");
    assert_eq!(options.pagination.per_page, Some(10));

    let resource = widgets(|b| {
        b.options(options);
    });
    assert!(resource.is_readonly());
    assert_eq!(resource.path(Action::Index, None), "/admin/catalog");
}

// --- Registry ---

#[test]
fn test_registry_register_and_lookup() {
    let mut registry = ResourceRegistry::new();
    registry.register(widgets(|_| {})).unwrap();

    let err = registry.register(widgets(|_| {})).unwrap_err();
    assert!(matches!(err, ResourceError::DuplicateResource(name) if name == "widgets"));

    let widgets = registry.get::<MemoryAdapter>("widgets").unwrap();
    assert_eq!(widgets.name(), "widgets");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.routes()[0].controller, "widgets_admin/admin");

    assert!(matches!(
        registry.get::<MemoryAdapter>("gadgets"),
        Err(ResourceError::UnknownResource(_))
    ));
}
