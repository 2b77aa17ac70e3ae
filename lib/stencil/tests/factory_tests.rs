//! Integration tests for template factories.

#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use stencil::prelude::*;
use stencil::EncodeError;

type Calls = Arc<Mutex<Vec<(Value, BodyType)>>>;

/// Records every payload it is given and writes a fixed body.
#[derive(Clone, Default)]
struct RecordingEncoder {
    calls: Calls,
}

impl RecordingEncoder {
    fn calls(&self) -> Vec<(Value, BodyType)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl Encoder for RecordingEncoder {
    fn encode(
        &self,
        payload: &Value,
        body_type: &BodyType,
        template: &mut RequestTemplate,
    ) -> stencil::Result<()> {
        self.calls
            .lock()
            .expect("lock")
            .push((payload.clone(), body_type.clone()));
        template.set_body("recorded");
        Ok(())
    }
}

struct FailingEncoder(fn() -> Error);

impl Encoder for FailingEncoder {
    fn encode(&self, _: &Value, _: &BodyType, _: &mut RequestTemplate) -> stencil::Result<()> {
        Err((self.0)())
    }
}

fn target() -> Arc<dyn Target> {
    Arc::new(HardCodedTarget::new("test", "http://localhost:8080"))
}

fn factory(metadata: CallMetadata) -> TemplateFactory {
    TemplateFactoryResolver::with_defaults().resolve(target(), Arc::new(metadata))
}

fn recording_factory(metadata: CallMetadata) -> (TemplateFactory, RecordingEncoder) {
    let encoder = RecordingEncoder::default();
    let resolver = TemplateFactoryResolver::builder()
        .encoder(encoder.clone())
        .query_map_encoder(FieldQueryMapEncoder)
        .build()
        .expect("resolver");
    (resolver.resolve(target(), Arc::new(metadata)), encoder)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Strategies
// ============================================================================

#[test]
fn test_plain_substitution() {
    let metadata = CallMetadata::builder(
        RequestTemplate::new(Method::Get, "/users/{id}?fields={fields}")
            .header("Accept", "{accept}"),
    )
    .config_key("UserApi#get")
    .name(0, "id")
    .name(1, "fields")
    .name(2, "accept")
    .build();
    let factory = factory(metadata);

    let template = factory
        .create(&[
            Value::from(7),
            Value::list(["name", "email"]),
            Value::from("application/json"),
        ])
        .expect("create");

    check!(factory.strategy() == Strategy::Plain);
    check!(template.body().is_none());
    check!(template.is_resolved());
    check!(template.query_values("fields") == Some(&strings(&["name", "email"])[..]));
    check!(
        template.header_values("accept") == Some(&[Some("application/json".to_string())][..])
    );
    insta::assert_snapshot!(
        template.to_string(),
        @"GET http://localhost:8080/users/7?fields=name&fields=email"
    );
}

#[test]
fn test_form_encoder_receives_only_form_params() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/items?c={c}"))
        .name(0, "a")
        .name(1, "b")
        .name(2, "c")
        .form_param("a")
        .form_param("b")
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let template = factory
        .create(&[Value::from("1"), Value::from("2"), Value::from("3")])
        .expect("create");

    check!(factory.strategy() == Strategy::FormEncoded);
    check!(encoder.calls() == vec![(Value::map([("a", "1"), ("b", "2")]), BodyType::FormMap)]);
    check!(template.query_values("c") == Some(&strings(&["3"])[..]));
    check!(template.query_values("a").is_none());
    check!(template.query_values("b").is_none());
}

#[test]
fn test_form_params_are_already_encoded() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/items/{b}?a={a}"))
        .name(0, "a")
        .name(1, "b")
        .name(2, "c")
        .form_param("a")
        .form_param("c")
        .encoded(1)
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let template = factory
        .create(&[Value::from("x/y"), Value::from("p%2Fq"), Value::from("z")])
        .expect("create");

    let already_encoded = template.already_encoded().collect::<Vec<_>>();
    check!(already_encoded.contains(&"a"));
    check!(already_encoded.contains(&"b"));
    check!(already_encoded.contains(&"c"));
    check!(encoder.calls() == vec![(Value::map([("a", "x/y"), ("c", "z")]), BodyType::FormMap)]);
    check!(template.query_values("a") == Some(&strings(&["x/y"])[..]));
    check!(template.path() == "/items/p%2Fq");
}

#[test]
fn test_default_form_encoding() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/login"))
        .name(0, "user")
        .name(1, "password")
        .form_param("user")
        .form_param("password")
        .build();

    let template = factory(metadata)
        .create(&[Value::from("ada"), Value::from("p@ss word")])
        .expect("create");

    let_assert!(Some(body) = template.body());
    check!(body.as_ref() == b"user=ada&password=p%40ss+word");
    check!(
        template.header_values("Content-Type")
            == Some(&[Some("application/x-www-form-urlencoded".to_string())][..])
    );
}

#[test]
fn test_always_encode_body_sends_all_arguments() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/things/{id}"))
        .name(0, "id")
        .body(1, BodyType::Any)
        .always_encode_body(true)
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let template = factory
        .create(&[Value::from("x"), Value::from("y")])
        .expect("create");

    check!(factory.strategy() == Strategy::BodyEncoded);
    check!(encoder.calls() == vec![(Value::list(["x", "y"]), BodyType::Arguments)]);
    check!(template.path() == "/things/x");
}

#[test]
fn test_always_encode_body_without_arguments() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/things"))
        .always_encode_body(true)
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let template = factory.create(&[]).expect("create");

    check!(encoder.calls() == vec![(Value::List(vec![]), BodyType::Arguments)]);
    check!(template.path() == "/things");
}

#[test]
fn test_body_argument_is_encoded_with_its_type() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Put, "/users/{id}"))
        .name(0, "id")
        .body(1, BodyType::named("User"))
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let user = Value::map([("name", "Ada")]);
    let template = factory
        .create(&[Value::from(1), user.clone()])
        .expect("create");

    check!(encoder.calls() == vec![(user, BodyType::named("User"))]);
    let_assert!(Some(body) = template.body());
    check!(body.as_ref() == b"recorded");
}

#[test]
fn test_required_body_is_enforced() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/users"))
        .name(0, "tag")
        .body(1, BodyType::of::<String>())
        .build();
    let (factory, encoder) = recording_factory(metadata);

    let_assert!(Err(err) = factory.create(&[Value::from("t"), Value::Null]));
    check!(err.is_invalid_argument());
    check!(err.to_string().contains("Body parameter 1 was null"));
    check!(encoder.calls().is_empty());
}

#[test]
fn test_body_template_is_expanded_raw() {
    let metadata = CallMetadata::builder(
        RequestTemplate::new(Method::Post, "/login")
            .body_template(r#"%7B"user":"{user}","password":"{password}"%7D"#),
    )
    .name(0, "user")
    .name(1, "password")
    .form_param("user")
    .form_param("password")
    .build();
    let factory = factory(metadata);

    let template = factory
        .create(&[Value::from("ada"), Value::from("a&b")])
        .expect("create");

    check!(factory.strategy() == Strategy::Plain);
    let_assert!(Some(body) = template.body());
    check!(body.as_ref() == br#"{"user":"ada","password":"a&b"}"#);
}

// ============================================================================
// Encoder errors
// ============================================================================

#[test]
fn test_encode_errors_pass_through() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/"))
        .body(0, BodyType::Any)
        .build();
    let resolver = TemplateFactoryResolver::builder()
        .encoder(FailingEncoder(|| Error::Encode(EncodeError::new("boom"))))
        .query_map_encoder(FieldQueryMapEncoder)
        .build()
        .expect("resolver");

    let factory = resolver.resolve(target(), Arc::new(metadata));
    let_assert!(Err(Error::Encode(err)) = factory.create(&[Value::from(1)]));
    check!(err.message() == "boom");
    check!(std::error::Error::source(&err).is_none());
}

#[test]
fn test_other_encoder_errors_are_wrapped() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Post, "/"))
        .name(0, "a")
        .form_param("a")
        .build();
    let resolver = TemplateFactoryResolver::builder()
        .encoder(FailingEncoder(|| Error::invalid_header("bad value")))
        .query_map_encoder(FieldQueryMapEncoder)
        .build()
        .expect("resolver");

    let factory = resolver.resolve(target(), Arc::new(metadata));
    let_assert!(Err(Error::Encode(err)) = factory.create(&[Value::from(1)]));
    check!(err.message() == "invalid header: bad value");
    let_assert!(Some(cause) = std::error::Error::source(&err));
    check!(cause.to_string() == "invalid header: bad value");
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn test_query_map_overrides_template_values() {
    let metadata =
        CallMetadata::builder(RequestTemplate::new(Method::Get, "/search?name=path_value"))
            .query_map_index(0)
            .build();

    let template = factory(metadata)
        .create(&[Value::map([("name", Value::list(["override"]))])])
        .expect("create");

    check!(template.query_values("name") == Some(&strings(&["override"])[..]));
}

#[test]
fn test_query_map_from_record_fields() {
    #[derive(Aggregate)]
    struct Filter {
        status: &'static str,
        owner: Option<String>,
        labels: Vec<&'static str>,
    }

    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/issues"))
        .query_map_index(0)
        .build();

    let template = factory(metadata)
        .create(&[Value::from(Filter {
            status: "open",
            owner: None,
            labels: vec!["bug", "good first issue"],
        })])
        .expect("create");

    check!(template.query_values("owner").is_none());
    insta::assert_snapshot!(
        template.query_string(),
        @"status=open&labels=bug&labels=good%20first%20issue"
    );
}

#[test]
fn test_header_map_preserves_nulls() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/"))
        .header_map_index(0)
        .build();

    let template = factory(metadata)
        .create(&[Value::map([(
            "X-Tags",
            Value::list([Some("a b"), None, Some("c/d")]),
        )])])
        .expect("create");

    check!(
        template.header_values("x-tags")
            == Some(&[Some("a b".to_string()), None, Some("c/d".to_string())][..])
    );

    let request = template.to_request().expect("request");
    check!(request.headers().len() == 2);
}

#[test]
fn test_maps_run_after_substitution() {
    let metadata = CallMetadata::builder(
        RequestTemplate::new(Method::Get, "/?page={page}").header("X-Mode", "{mode}"),
    )
    .name(0, "page")
    .name(1, "mode")
    .query_map_index(2)
    .header_map_index(3)
    .build();

    let template = factory(metadata)
        .create(&[
            Value::from(1),
            Value::from("fast"),
            Value::map([("page", 2)]),
            Value::map([("X-Mode", "slow")]),
        ])
        .expect("create");

    check!(template.query_values("page") == Some(&strings(&["2"])[..]));
    check!(template.header_values("X-Mode") == Some(&[Some("slow".to_string())][..]));
}

// ============================================================================
// Expansion and binding
// ============================================================================

#[derive(Aggregate)]
struct Pair {
    p: &'static str,
    q: i32,
}

#[test]
fn test_expanded_fields_bind_in_declared_order() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/{first}/{second}"))
        .expand_aggregate::<Pair>(0)
        .name(0, "first")
        .name(1, "second")
        .build();

    let template = factory(metadata)
        .create(&[Value::from(Pair { p: "left", q: 2 })])
        .expect("create");

    check!(template.path() == "/left/2");
}

#[test]
fn test_expansion_follows_the_descriptor_not_the_record() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/{first}/{second}"))
        .expand(0, FieldOrder::new(["p", "q"]))
        .name(0, "first")
        .name(1, "second")
        .build();
    let factory = factory(metadata);

    let forward = Record::new("Pair").field("p", "left").field("q", 2);
    let reversed = Record::new("Pair").field("q", 2).field("p", "left");

    for record in [forward, reversed] {
        let template = factory.create(&[Value::Record(record)]).expect("create");
        check!(template.path() == "/left/2");
    }
}

#[test]
fn test_positions_after_an_expanded_argument_shift() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/{p}/{q}?tail={tail}"))
        .expand_aggregate::<Pair>(0)
        .name(0, "p")
        .name(1, "q")
        .name(2, "tail")
        .build();

    let template = factory(metadata)
        .create(&[Value::from(Pair { p: "a", q: 1 }), Value::from("end")])
        .expect("create");

    check!(template.url() == "http://localhost:8080/a/1?tail=end");
}

#[test]
fn test_encoded_arguments_are_not_escaped() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/{raw}/{plain}"))
        .name(0, "raw")
        .name(1, "plain")
        .encoded(0)
        .build();

    let template = factory(metadata)
        .create(&[Value::from("a%2Fb"), Value::from("a/b")])
        .expect("create");

    check!(template.path() == "/a%2Fb/a%2Fb");
}

#[test]
fn test_cookie_expander() {
    let metadata = CallMetadata::builder(
        RequestTemplate::new(Method::Get, "/me").header("Cookie", "session={session}"),
    )
    .name(0, "session")
    .expander(0, Arc::new(CookieExpander::new("session")))
    .build();
    let factory = factory(metadata);

    let template = factory
        .create(&[Value::from(Cookie::new("session", "abc"))])
        .expect("create");
    check!(template.header_values("cookie") == Some(&[Some("session=abc".to_string())][..]));

    let_assert!(Err(err) = factory.create(&[Value::from(Cookie::new("other", "abc"))]));
    check!(err.is_invalid_argument());
}

// ============================================================================
// Target and lifecycle
// ============================================================================

#[test]
fn test_url_argument_overrides_target() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/ping"))
        .url_index(0)
        .build();
    let factory = factory(metadata);

    let template = factory
        .create(&[Value::from("https://other.example.com/")])
        .expect("create");
    check!(template.url() == "https://other.example.com/ping");

    let_assert!(Err(err) = factory.create(&[Value::Null]));
    check!(err.to_string().contains("URI parameter 0 was null"));
}

#[test]
fn test_url_argument_is_read_before_expansion() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/{p}/{q}"))
        .url_index(0)
        .expand_aggregate::<Pair>(1)
        .name(1, "p")
        .name(2, "q")
        .build();

    let template = factory(metadata)
        .create(&[
            Value::from("https://other.example.com"),
            Value::from(Pair { p: "a", q: 1 }),
        ])
        .expect("create");

    check!(template.url() == "https://other.example.com/a/1");
}

#[test]
fn test_create_is_idempotent() {
    let metadata = CallMetadata::builder(
        RequestTemplate::new(Method::Post, "/users/{id}?q={q}").header("X-Id", "{id}"),
    )
    .name(0, "id")
    .name(1, "q")
    .body(2, BodyType::Any)
    .build();
    let factory = factory(metadata);
    let argv = [
        Value::from(5),
        Value::list(["a", "b"]),
        Value::map([("name", "Ada")]),
    ];

    let mut first = factory.create(&argv).expect("create");
    let second = factory.create(&argv).expect("create");
    check!(first == second);

    first.set_header("X-Id", "changed");
    check!(second.header_values("X-Id") == Some(&[Some("5".to_string())][..]));
    check!(!factory.metadata().template().is_resolved());
    check!(factory.metadata().template().path() == "/users/{id}");
}

#[test]
fn test_missing_variable() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Get, "/users/{id}")).build();

    let_assert!(Err(Error::MissingVariable(name)) = factory(metadata).create(&[]));
    check!(name == "id");
}

#[test]
fn test_transport_handoff() {
    let metadata = CallMetadata::builder(RequestTemplate::new(Method::Put, "/users/{id}"))
        .name(0, "id")
        .body(1, BodyType::Any)
        .build();

    let template = factory(metadata)
        .create(&[Value::from(3), Value::map([("name", "Ada")])])
        .expect("create");
    let request = template.to_request().expect("request");
    check!(request.url().as_str() == "http://localhost:8080/users/3");
    check!(request.header("content-type") == Some("application/json"));

    let converted = request.into_http().expect("http request");
    check!(*converted.method() == http::Method::PUT);
    check!(converted.body().as_ref() == br#"{"name":"Ada"}"#);
}
