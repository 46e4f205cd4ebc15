//! Guide content declarations.
//!
//! This is the declaration layer: it builds the document store served by
//! the process and registers every resource, tool, and prompt on the
//! registry. All of it runs once at startup; a declaration error here is
//! fatal before the server accepts its first request.

mod docs;

use std::sync::Arc;

use crate::context::{AppContext, DocStore};
use crate::registry::{
    BoundArgs, HandlerError, HandlerFuture, ParamSpec, ParamType, Payload, Registry, RegistryError,
};

/// Build the document store the server holds for its process lifetime.
pub fn guide_store() -> DocStore {
    let mut store = DocStore::default();
    for (section, topic, title, body) in docs::GUIDE_DOCS {
        store.insert(*section, *topic, *title, *body);
    }
    store
}

/// Register every capability this server exposes.
///
/// One literal resource per stored document, a templated fallback that
/// addresses any document by section and topic, the guide tools, and the
/// guide prompts.
pub fn register_all(registry: &mut Registry, store: &DocStore) -> Result<(), RegistryError> {
    for section in store.sections() {
        for topic in store.topics(section) {
            let uri = format!("{section}://{topic}");
            let title = store
                .get(section, topic)
                .map(|doc| doc.title.clone())
                .unwrap_or_default();
            registry.resource(&uri, &title, doc_handler(section, topic))?;
        }
    }

    registry.resource(
        "docs://{category}/{topic}",
        "Any guide document, addressed by section and topic",
        |args: BoundArgs, ctx: Arc<AppContext>| -> HandlerFuture {
            let category = args.str_arg("category").unwrap_or_default().to_string();
            let topic = args.str_arg("topic").unwrap_or_default().to_string();
            Box::pin(async move {
                let doc = ctx.docs.get(&category, &topic).ok_or_else(|| {
                    HandlerError::new(format!("no document under {category}/{topic}"))
                })?;
                Ok(Payload::text(format!("# {}\n\n{}", doc.title, doc.body)))
            })
        },
    )?;

    registry.tool(
        "get_concept_details",
        vec![ParamSpec::required("concept_name", ParamType::String)],
        "Detailed information on one MCP concept \
         (overview, server, resources, tools, prompts)",
        |args, ctx| {
            let name = args.str_arg("concept_name").unwrap_or_default().to_string();
            Box::pin(async move {
                match ctx.docs.get("concepts", &name) {
                    Some(doc) => Ok(Payload::text(doc.body.clone())),
                    None => {
                        let known: Vec<&str> = ctx.docs.topics("concepts").collect();
                        Err(HandlerError::new(format!(
                            "unknown concept {name:?}; available: {}",
                            known.join(", ")
                        )))
                    }
                }
            })
        },
    )?;

    registry.tool(
        "list_available_resources",
        Vec::new(),
        "List every guide resource URI on this server, grouped by section",
        |_args, ctx| {
            Box::pin(async move {
                let mut out = String::from("Available resources:\n");
                for section in ctx.docs.sections() {
                    out.push_str(&format!("\n## {}\n", section_label(section)));
                    for topic in ctx.docs.topics(section) {
                        out.push_str(&format!("- {section}://{topic}\n"));
                    }
                }
                Ok(Payload::text(out))
            })
        },
    )?;

    registry.tool(
        "get_example_code",
        vec![ParamSpec::required("example_name", ParamType::String)],
        "Example code by name (echo_server, sqlite_explorer)",
        |args, ctx| {
            let name = args.str_arg("example_name").unwrap_or_default().to_string();
            Box::pin(async move {
                match ctx.docs.get("examples", &name) {
                    Some(doc) => Ok(Payload::text(doc.body.clone())),
                    None => {
                        let known: Vec<&str> = ctx.docs.topics("examples").collect();
                        Err(HandlerError::new(format!(
                            "unknown example {name:?}; available: {}",
                            known.join(", ")
                        )))
                    }
                }
            })
        },
    )?;

    registry.prompt(
        "mcp_guide",
        Vec::new(),
        "Interactive entry point for the MCP build guide",
        |_args, _ctx| {
            Box::pin(async move {
                Ok(Payload::text(
                    "I am the MCP build guide. I can help you understand how to \
                     build MCP servers and clients.\n\n\
                     You can interact with me in a few ways:\n\
                     1. Ask for details on a specific MCP concept (server, \
                     resources, tools, prompts)\n\
                     2. Read the installation and running guides\n\
                     3. Fetch example code\n\
                     4. Explore advanced usage\n\n\
                     What would you like to know?",
                ))
            })
        },
    )?;

    registry.prompt(
        "explain_concept",
        vec![
            ParamSpec::required("concept", ParamType::String),
            ParamSpec::optional("audience", ParamType::String),
        ],
        "Ask for an explanation of one MCP concept, optionally tuned to an audience",
        |args, _ctx| {
            let concept = args.str_arg("concept").unwrap_or_default().to_string();
            let audience = args.str_arg("audience").map(str::to_string);
            Box::pin(async move {
                let text = match audience {
                    Some(audience) => format!(
                        "Explain the MCP concept of {concept} to {audience}. Cover \
                         what it is for, how it is addressed, and one worked example."
                    ),
                    None => format!(
                        "Explain the MCP concept of {concept}. Cover what it is for, \
                         how it is addressed, and one worked example."
                    ),
                };
                Ok(Payload::text(text))
            })
        },
    )?;

    Ok(())
}

fn doc_handler(
    section: &str,
    topic: &str,
) -> impl Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync + 'static {
    let section = section.to_string();
    let topic = topic.to_string();
    move |_args, ctx| {
        let section = section.clone();
        let topic = topic.clone();
        Box::pin(async move {
            let doc = ctx.docs.get(&section, &topic).ok_or_else(|| {
                HandlerError::new(format!("document {section}://{topic} is not in the store"))
            })?;
            Ok(Payload::text(doc.body.clone()))
        })
    }
}

fn section_label(section: &str) -> &str {
    match section {
        "concepts" => "Core concepts",
        "setup" => "Installation and running",
        "examples" => "Example code",
        "advanced" => "Advanced usage",
        other => other,
    }
}
