//! Dispatcher behavior: matching, tie-breaking, argument binding,
//! failure isolation, and cancellation.

use std::sync::Arc;
use std::time::Duration;

use mcp_guide_server::context::AppContext;
use mcp_guide_server::dispatch::{DispatchError, Dispatcher};
use mcp_guide_server::registry::{
    ArgValue, BoundArgs, CapabilityKind, HandlerError, HandlerFuture, ParamSpec, ParamType,
    Payload, Registry,
};
use serde_json::json;

fn dispatcher(registry: Registry) -> Dispatcher {
    Dispatcher::new(
        Arc::new(registry),
        Arc::new(AppContext::default()),
        Duration::from_secs(5),
    )
}

fn text_handler(
    reply: &'static str,
) -> impl Fn(BoundArgs, Arc<AppContext>) -> HandlerFuture + Send + Sync + 'static {
    move |_args, _ctx| Box::pin(async move { Ok(Payload::text(reply)) })
}

fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().expect("arguments fixture must be an object")
}

// ---------------------------------------------------------------------------
// Resource matching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_template_end_to_end() {
    let mut registry = Registry::new();
    registry
        .resource("users://{user_id}/profile", "user profile", |args, _ctx| {
            let user_id = args.str_arg("user_id").unwrap_or_default().to_string();
            Box::pin(async move { Ok(Payload::text(format!("Profile for {user_id}"))) })
        })
        .unwrap();
    let dispatcher = dispatcher(registry);

    let envelope = dispatcher
        .dispatch(CapabilityKind::Resource, "users://42/profile", None)
        .await
        .unwrap();

    assert_eq!(envelope.kind, CapabilityKind::Resource);
    assert_eq!(envelope.content_type, "text");
    assert_eq!(envelope.payload, Payload::text("Profile for 42"));
}

#[tokio::test]
async fn segment_count_mismatch_is_not_found() {
    let mut registry = Registry::new();
    registry
        .resource("users://{user_id}/profile", "", text_handler("x"))
        .unwrap();
    let dispatcher = dispatcher(registry);

    for uri in [
        "users://42",
        "users://42/profile/extra",
        "users://{not-matching-segment-count}",
        "other://42/profile",
        "not-a-uri",
    ] {
        let err = dispatcher
            .dispatch(CapabilityKind::Resource, uri, None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, DispatchError::NotFound { .. }),
            "{uri:?} should be NotFound"
        );
    }
}

#[tokio::test]
async fn literal_beats_template_regardless_of_registration_order() {
    let mut registry = Registry::new();
    // Template registered first; the literal still wins on specificity.
    registry.resource("files://{name}", "", text_handler("template")).unwrap();
    registry.resource("files://readme", "", text_handler("literal")).unwrap();
    let dispatcher = dispatcher(registry);

    for _ in 0..20 {
        let envelope = dispatcher
            .dispatch(CapabilityKind::Resource, "files://readme", None)
            .await
            .unwrap();
        assert_eq!(envelope.payload, Payload::text("literal"));
    }

    let envelope = dispatcher
        .dispatch(CapabilityKind::Resource, "files://other", None)
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("template"));
}

#[tokio::test]
async fn equal_specificity_ties_break_by_registration_order() {
    let mut registry = Registry::new();
    registry.resource("echo://{a}", "", text_handler("first")).unwrap();
    registry.resource("echo://{b}", "", text_handler("second")).unwrap();
    let dispatcher = dispatcher(registry);

    for _ in 0..20 {
        let envelope = dispatcher
            .dispatch(CapabilityKind::Resource, "echo://hi", None)
            .await
            .unwrap();
        assert_eq!(envelope.payload, Payload::text("first"));
    }
}

#[tokio::test]
async fn typed_slot_conversion_is_strict() {
    let mut registry = Registry::new();
    registry
        .resource("posts://{id:integer}/comments", "", |args, _ctx| {
            let id = args.int_arg("id").unwrap_or(-1);
            Box::pin(async move { Ok(Payload::text(format!("comments for {id}"))) })
        })
        .unwrap();
    let dispatcher = dispatcher(registry);

    let err = dispatcher
        .dispatch(CapabilityKind::Resource, "posts://abc/comments", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));

    // The failed binding leaves the registry and other dispatches intact.
    let envelope = dispatcher
        .dispatch(CapabilityKind::Resource, "posts://7/comments", None)
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("comments for 7"));
}

// ---------------------------------------------------------------------------
// Tool and prompt binding
// ---------------------------------------------------------------------------

fn lookup_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .tool(
            "lookup",
            vec![
                ParamSpec::required("q", ParamType::String),
                ParamSpec::optional("limit", ParamType::Integer),
            ],
            "",
            |args, _ctx| {
                let q = args.str_arg("q").unwrap_or_default().to_string();
                let limit = match args.get("limit") {
                    Some(ArgValue::Absent) => "absent".to_string(),
                    Some(ArgValue::Int(n)) => n.to_string(),
                    other => format!("unexpected {other:?}"),
                };
                Box::pin(async move { Ok(Payload::text(format!("q={q} limit={limit}"))) })
            },
        )
        .unwrap();
    registry
}

#[tokio::test]
async fn missing_optional_binds_as_explicit_absent() {
    let dispatcher = dispatcher(lookup_registry());

    let envelope = dispatcher
        .dispatch(CapabilityKind::Tool, "lookup", Some(&args(json!({"q": "rust"}))))
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("q=rust limit=absent"));

    let envelope = dispatcher
        .dispatch(
            CapabilityKind::Tool,
            "lookup",
            Some(&args(json!({"q": "rust", "limit": 3}))),
        )
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("q=rust limit=3"));
}

#[tokio::test]
async fn missing_required_parameter_fails_binding() {
    let dispatcher = dispatcher(lookup_registry());

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "lookup", Some(&args(json!({"limit": 3}))))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "lookup", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));
}

#[tokio::test]
async fn unknown_parameter_names_fail_binding() {
    let dispatcher = dispatcher(lookup_registry());

    let err = dispatcher
        .dispatch(
            CapabilityKind::Tool,
            "lookup",
            Some(&args(json!({"q": "rust", "offset": 1}))),
        )
        .await
        .unwrap_err();
    match err {
        DispatchError::ArgumentBinding { reason, .. } => {
            assert!(reason.contains("offset"), "reason should name the parameter: {reason}")
        }
        other => panic!("expected ArgumentBinding, got {other:?}"),
    }
}

#[tokio::test]
async fn json_type_conversion_is_strict() {
    let dispatcher = dispatcher(lookup_registry());

    // Number where a string is declared.
    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "lookup", Some(&args(json!({"q": 9}))))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));

    // Fractional number where an integer is declared.
    let err = dispatcher
        .dispatch(
            CapabilityKind::Tool,
            "lookup",
            Some(&args(json!({"q": "rust", "limit": 1.5}))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));

    // Numeric string where an integer is declared: no silent coercion.
    let err = dispatcher
        .dispatch(
            CapabilityKind::Tool,
            "lookup",
            Some(&args(json!({"q": "rust", "limit": "3"}))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::ArgumentBinding { .. }));
}

#[tokio::test]
async fn unknown_tool_is_not_found() {
    let dispatcher = dispatcher(lookup_registry());

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "nonexistent", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Invocation: failure isolation and cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn handler_failure_is_wrapped_and_isolated() {
    let mut registry = Registry::new();
    registry
        .tool("broken", Vec::new(), "", |_args, _ctx| {
            Box::pin(async move {
                Err::<Payload, _>(HandlerError::new("invalid query"))
            })
        })
        .unwrap();
    registry.tool("healthy", Vec::new(), "", text_handler("ok")).unwrap();
    let dispatcher = dispatcher(registry);

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "broken", None)
        .await
        .unwrap_err();
    match err {
        DispatchError::HandlerExecution { message, .. } => {
            assert_eq!(message, "invalid query")
        }
        other => panic!("expected HandlerExecution, got {other:?}"),
    }

    // The failure leaves other capabilities untouched.
    let envelope = dispatcher
        .dispatch(CapabilityKind::Tool, "healthy", None)
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("ok"));
}

#[tokio::test]
async fn handler_panic_does_not_tear_down_the_dispatcher() {
    let mut registry = Registry::new();
    registry
        .tool("panicky", Vec::new(), "", |_args, _ctx| {
            Box::pin(async move { panic!("boom") })
        })
        .unwrap();
    registry.tool("healthy", Vec::new(), "", text_handler("ok")).unwrap();
    let dispatcher = dispatcher(registry);

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "panicky", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::HandlerExecution { .. }));

    let envelope = dispatcher
        .dispatch(CapabilityKind::Tool, "healthy", None)
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("ok"));
}

#[tokio::test]
async fn slow_handler_is_cancelled_not_hung() {
    let mut registry = Registry::new();
    registry
        .tool("slow", Vec::new(), "", |_args, _ctx| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Payload::text("too late"))
            })
        })
        .unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        Arc::new(AppContext::default()),
        Duration::from_millis(50),
    );

    let err = dispatcher
        .dispatch(CapabilityKind::Tool, "slow", None)
        .await
        .unwrap_err();
    match err {
        DispatchError::HandlerExecution { message, .. } => {
            assert!(message.contains("cancelled"), "message should name cancellation: {message}")
        }
        other => panic!("expected HandlerExecution, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_requests_fail_independently() {
    let mut registry = Registry::new();
    registry
        .tool("broken", Vec::new(), "", |_args, _ctx| {
            Box::pin(async move {
                Err::<Payload, _>(HandlerError::new("nope"))
            })
        })
        .unwrap();
    registry.tool("healthy", Vec::new(), "", text_handler("ok")).unwrap();
    let dispatcher = dispatcher(registry);

    let (bad, good) = tokio::join!(
        dispatcher.dispatch(CapabilityKind::Tool, "broken", None),
        dispatcher.dispatch(CapabilityKind::Tool, "healthy", None),
    );

    assert!(matches!(bad.unwrap_err(), DispatchError::HandlerExecution { .. }));
    assert_eq!(good.unwrap().payload, Payload::text("ok"));
}

#[tokio::test]
async fn structured_payloads_carry_json_content_type() {
    let mut registry = Registry::new();
    registry
        .tool("stats", Vec::new(), "", |_args, _ctx| {
            Box::pin(async move {
                Ok(Payload::Structured(json!({"documents": 11, "sections": 4})))
            })
        })
        .unwrap();
    let dispatcher = dispatcher(registry);

    let envelope = dispatcher
        .dispatch(CapabilityKind::Tool, "stats", None)
        .await
        .unwrap();
    assert_eq!(envelope.content_type, "json");
    assert_eq!(
        envelope.payload,
        Payload::Structured(json!({"documents": 11, "sections": 4}))
    );
}

#[tokio::test]
async fn handlers_read_the_shared_context() {
    let mut store = mcp_guide_server::context::DocStore::default();
    store.insert("notes", "today", "Today", "remember the milk");

    let mut registry = Registry::new();
    registry
        .resource("notes://{topic}", "", |args, ctx| {
            let topic = args.str_arg("topic").unwrap_or_default().to_string();
            Box::pin(async move {
                let doc = ctx
                    .docs
                    .get("notes", &topic)
                    .ok_or_else(|| HandlerError::new(format!("no note {topic:?}")))?;
                Ok(Payload::text(doc.body.clone()))
            })
        })
        .unwrap();

    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        Arc::new(AppContext::new(store)),
        Duration::from_secs(5),
    );

    let envelope = dispatcher
        .dispatch(CapabilityKind::Resource, "notes://today", None)
        .await
        .unwrap();
    assert_eq!(envelope.payload, Payload::text("remember the milk"));

    let err = dispatcher
        .dispatch(CapabilityKind::Resource, "notes://tomorrow", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::HandlerExecution { .. }));
}
