//! # Resource Recipe Demo
//!
//! Registers three resources over the in-memory adapter and walks through a
//! typical admin session:
//!
//! 1. Build a [`ResourceRegistry`] with a plural, a read-only and a singular resource.
//! 2. Print the route table the host router would mount.
//! 3. Serve a scoped, sorted, paginated list request.
//! 4. Create and look up an instance.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! ```

use resource_recipe::memory::{MemoryAdapter, Record};
use resource_recipe::tracing::setup_tracing;
use resource_recipe::{
    Action, Attribute, AttributeKind, ModelNamespace, PaginationOptions, Params, Resource,
    ResourceError, ResourceRegistry, Scope, SortOrder,
};
use std::sync::Arc;
use tracing::{error, info, Instrument};

struct Widget;
struct AuditLog;
struct Setting;

fn build_registry() -> Result<ResourceRegistry, ResourceError> {
    let mut namespace = ModelNamespace::new();
    namespace
        .register_type::<Widget>("Widget")
        .register_type::<AuditLog>("AuditLog")
        .register_type::<Setting>("Setting");
    let namespace = Arc::new(namespace);

    let mut registry = ResourceRegistry::new();

    let widgets = MemoryAdapter::with_records((1..=12).map(|i| {
        Record::new(i)
            .with("name", format!("Widget {i:02}"))
            .with("price", (i * 7 % 50).to_string())
            .with("stock", (i % 3).to_string())
    }))
    .attributes(vec![
        Attribute::new("id", AttributeKind::Integer),
        Attribute::new("name", AttributeKind::String),
        Attribute::new("price", AttributeKind::Integer),
        Attribute::new("stock", AttributeKind::Integer),
    ])
    .require("name");

    registry.register(Resource::<MemoryAdapter>::build("widgets", |b| {
        b.namespace(namespace.clone())
            .adapter(widgets)
            .pagination(PaginationOptions {
                per_page: Some(5),
                max_per_page: Some(20),
            })
            .scope_with(
                Scope::new("in_stock", |records: Vec<Record>, _: &Params| {
                    records
                        .into_iter()
                        .filter(|r| r.get("stock") != Some("0"))
                        .collect()
                })
                .with_default(true),
            )
            .scope("cheap", |records, _| {
                records
                    .into_iter()
                    .filter(|r| r.get("price").and_then(|p| p.parse::<u32>().ok()) < Some(20))
                    .collect()
            })
            .column_sort("name", |mut records, order| {
                records.sort_by(|a, b| a.get("name").cmp(&b.get("name")));
                if order == SortOrder::Desc {
                    records.reverse();
                }
                records
            })
            .return_to(Action::Create, |resource, _| resource.path(Action::Index, None))
            .additional_routes(|routes| {
                routes.get("export", "export");
                routes.member(|m| {
                    m.post("duplicate", "duplicate");
                });
            });
    })?)?;

    registry.register(Resource::<MemoryAdapter>::build("audit_logs", |b| {
        b.namespace(namespace.clone()).readonly(true);
    })?)?;

    registry.register(Resource::<MemoryAdapter>::build("setting", |b| {
        b.namespace(namespace.clone())
            .singular(true)
            .find_instance(|_, _, _| {
                Box::pin(async { Ok(Some(Record::new(1).with("theme", "dark"))) })
            });
    })?)?;

    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting resource demo");
    let registry = build_registry().map_err(|e| e.to_string())?;

    for route in registry.routes() {
        info!(
            name = %route.name,
            shape = ?route.shape,
            controller = %route.controller,
            except = ?route.except,
            nested = route.nested.len(),
            "Route"
        );
    }

    let widgets = registry
        .get::<MemoryAdapter>("widgets")
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("list_request");
    let listing = async {
        let params = Params::new()
            .with("scope", "cheap,unknown")
            .with("sort", "price")
            .with("order", "desc")
            .with("page", "1");
        let page = widgets.prepare_collection(&params).await?;
        for item in &page {
            info!(param = %item.param, label = %item.label, "Row");
        }
        let counts = widgets.scope_counts(&Params::new()).await?;
        info!(?counts, "Scope counts");
        Ok::<_, ResourceError>(())
    }
    .instrument(span)
    .await;
    if let Err(e) = listing {
        error!(error = %e, "List request failed");
    }

    let create = async {
        let params = widgets.permitted_params(
            &Params::new().with("name", "Flange").with("admin", "true"),
            None,
        )?;
        let mut flange = widgets.build_instance(&params).await?;
        if widgets.save_instance(&mut flange).await? {
            let path = widgets.instance_path(&flange, None)?;
            let title = widgets.translate("admin.created", &Default::default())?;
            let redirect = widgets.return_location(Action::Create, Some(&flange));
            info!(%path, %title, ?redirect, "Created");
        }

        let setting = registry.get::<MemoryAdapter>("setting")?;
        let current = setting.find_instance("", &Params::new()).await?;
        let path = setting.instance_path(&current, Some(Action::Edit))?;
        info!(%path, "Singular resource");
        Ok::<_, ResourceError>(())
    }
    .instrument(tracing::info_span!("create_request"))
    .await;
    if let Err(e) = create {
        error!(error = %e, "Create request failed");
    }

    info!("Demo completed");
    Ok(())
}
