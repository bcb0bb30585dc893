//! The migration rule set — actix-web test harness to the in-crate test
//! server API.
//!
//! Five rules, applied in this exact order. Later rules are written against
//! the output of earlier ones, so the order is part of the contract.

use super::rewrite::Rule;

/// The request-builder chain collapsed by rule 3. The twelve spaces of
/// continuation indent between the three call lines are matched exactly;
/// reformatted call sites are left alone.
const REQUEST_BUILDER_PATTERN: &str = r#"test::TestRequest::default\(\)\n            \.method\(Method::(\w+)\)\n            \.uri\("/(\w+)/(\w+)"\)"#;

/// Build the rule list. Always the same five, in the same order, for every
/// target file.
pub fn migration_rules() -> Vec<Rule> {
    vec![
        Rule::literal("set_json_rename", "set_json", "json_body"),
        Rule::literal("to_request_await", ".to_request();", ".await.unwrap();"),
        Rule::structural(
            "request_builder",
            REQUEST_BUILDER_PATTERN,
            r#"TestRequest::new(Method::$1, "$2/$3")"#,
        ),
        Rule::literal(
            "process_test_request",
            "let res: Value = test::call_and_read_body_json(&app, req).await;",
            "let res = server().process_test_request(req).await.unwrap().body_as_json().unwrap();",
        ),
        Rule::literal(
            "server_imports",
            "use actix_http::Method;",
            "use hyper::Method;\nuse teo::server::{server::Server, test_request::TestRequest};",
        ),
    ]
}
