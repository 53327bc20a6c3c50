//! Conversion of configuration settings into resource definitions.
//!
//! Matchers are compiled here so that a bad regex is reported at load time.
//! A method entry without `response` is passed through with no handler and
//! rejected by the resource compiler.

use super::resource::{MethodSetting, RequestSetting, ResourceSetting, ResponseSetting};
use crate::predicate::{
    compile_header_matcher, compile_query_matcher, CompiledBodyMatcher, RequestPredicate,
};
use crate::request::HttpMethod;
use crate::response::{CannedBody, CannedResponse};
use crate::template::has_template_variables;
use crate::rest::{
    ConfigurationError, MethodHandlerDefinition, ResourceDefinition, SubResourceDefinition,
};
use hyper::header::{HeaderName, HeaderValue};
use hyper::StatusCode;
use std::time::Duration;

/// Lower every top-level resource. Fails on the first invalid entry.
pub fn lower(resources: &[ResourceSetting]) -> Result<Vec<ResourceDefinition>, ConfigurationError> {
    resources
        .iter()
        .map(|resource| lower_resource(resource, ""))
        .collect()
}

fn lower_resource(
    setting: &ResourceSetting,
    parent_path: &str,
) -> Result<ResourceDefinition, ConfigurationError> {
    let path = format!("{}/{}", parent_path, setting.name);
    let mut resource = ResourceDefinition::new(setting.name.clone());

    for (method, entries) in setting.methods() {
        for (index, entry) in entries.iter().enumerate() {
            let location = Location {
                path: &path,
                method,
                index,
            };
            resource = resource.handler(lower_method(entry, &location)?);
        }
    }

    for sub in &setting.resource {
        let parent_id = sub.id.as_ref().map(|id| id.to_matcher());
        let sub_path = match &parent_id {
            Some(id) => format!("{}/{}", path, id),
            None => path.clone(),
        };
        let definition = lower_resource(&sub.resource, &sub_path)?;
        match parent_id {
            Some(id) => resource = resource.sub_resource(id, definition),
            // Left for the compiler to report as a missing parent id
            None => resource.sub_resources.push(SubResourceDefinition {
                parent_id: None,
                resource: definition,
            }),
        }
    }

    Ok(resource)
}

/// Where a method entry sits, for error messages.
struct Location<'a> {
    path: &'a str,
    method: HttpMethod,
    index: usize,
}

impl Location<'_> {
    fn invalid_matcher(&self, field: String, reason: impl ToString) -> ConfigurationError {
        ConfigurationError::InvalidMatcher {
            path: self.path.to_string(),
            method: self.method,
            index: self.index,
            field,
            reason: reason.to_string(),
        }
    }

    fn invalid_response(&self, reason: String) -> ConfigurationError {
        ConfigurationError::InvalidResponse {
            path: self.path.to_string(),
            method: self.method,
            index: self.index,
            reason,
        }
    }
}

fn lower_method(
    setting: &MethodSetting,
    location: &Location<'_>,
) -> Result<MethodHandlerDefinition, ConfigurationError> {
    let mut definition = MethodHandlerDefinition::new(location.method);

    if let Some(id) = &setting.id {
        definition = definition.with_id(id.to_matcher());
    }

    if let Some(request) = setting.request.as_ref().filter(|r| !r.is_empty()) {
        definition = definition.with_predicate(lower_request(request, location)?);
    }

    if let Some(response) = &setting.response {
        definition = definition.with_response(lower_response(response, location)?);
    }

    Ok(definition)
}

fn lower_request(
    setting: &RequestSetting,
    location: &Location<'_>,
) -> Result<RequestPredicate, ConfigurationError> {
    let mut predicates = Vec::new();

    if let Some(text) = &setting.text {
        let body = CompiledBodyMatcher::text(&text.clone().into_matcher())
            .map_err(|e| location.invalid_matcher("text".to_string(), e))?;
        predicates.push(RequestPredicate::Body(body));
    }

    if let Some(json) = &setting.json {
        predicates.push(RequestPredicate::Body(CompiledBodyMatcher::json(json.clone())));
    }

    for (name, matcher) in &setting.headers {
        let field = compile_header_matcher(name, &matcher.clone().into_matcher())
            .map_err(|e| location.invalid_matcher(format!("header '{}'", name), e))?;
        predicates.push(RequestPredicate::Field(field));
    }

    for (name, matcher) in &setting.queries {
        let field = compile_query_matcher(name, &matcher.clone().into_matcher())
            .map_err(|e| location.invalid_matcher(format!("query '{}'", name), e))?;
        predicates.push(RequestPredicate::Field(field));
    }

    Ok(RequestPredicate::all(predicates))
}

fn lower_response(
    setting: &ResponseSetting,
    location: &Location<'_>,
) -> Result<CannedResponse, ConfigurationError> {
    let status = StatusCode::from_u16(setting.status)
        .map_err(|_| location.invalid_response(format!("invalid status code {}", setting.status)))?;

    let body = match (&setting.text, &setting.json) {
        (Some(_), Some(_)) => {
            return Err(location.invalid_response("both 'text' and 'json' given".to_string()))
        }
        (Some(text), None) => CannedBody::Text(text.clone()),
        (None, Some(json)) => CannedBody::Json(json.clone()),
        (None, None) => CannedBody::Empty,
    };

    let mut response = CannedResponse::new(status)
        .with_body(body)
        .with_template(setting.template);

    for (name, value) in &setting.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(location.invalid_response(format!("invalid header name '{}'", name)));
        }
        // Templated values are only known per request
        let templated = setting.template && has_template_variables(value);
        if !templated && HeaderValue::from_str(value).is_err() {
            return Err(location.invalid_response(format!("invalid value for header '{}'", name)));
        }
        response = response.with_header(name.clone(), value.clone());
    }

    if let Some(ms) = setting.latency {
        response = response.with_latency(Duration::from_millis(ms));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resource::{IdSetting, SubResourceSetting};
    use crate::predicate::{StringMatcher, ValueMatcher};
    use crate::request::MockRequest;
    use crate::rest::RoutingTable;
    use hyper::Method;

    fn respond_text(text: &str) -> Option<ResponseSetting> {
        Some(ResponseSetting {
            text: Some(text.to_string()),
            ..Default::default()
        })
    }

    fn get(id: &str, text: &str) -> MethodSetting {
        MethodSetting {
            id: Some(IdSetting::Text(id.to_string())),
            request: None,
            response: respond_text(text),
        }
    }

    #[test]
    fn test_lower_and_compile_tree() {
        let settings = vec![ResourceSetting {
            name: "targets".to_string(),
            get: vec![get("1", "one"), get("*", "any")],
            resource: vec![SubResourceSetting {
                id: Some(IdSetting::Number(1)),
                resource: ResourceSetting {
                    name: "subs".to_string(),
                    get: vec![get("1", "sub")],
                    ..Default::default()
                },
            }],
            ..Default::default()
        }];

        let definitions = lower(&settings).unwrap();
        let table = RoutingTable::compile(&definitions).unwrap();
        let patterns: Vec<_> = table.routes().iter().map(ToString::to_string).collect();
        assert_eq!(
            patterns,
            vec!["GET /targets/1", "GET /targets/*", "GET /targets/1/subs/1"]
        );
    }

    #[test]
    fn test_request_setting_becomes_predicate() {
        let settings = vec![ResourceSetting {
            name: "targets".to_string(),
            patch: vec![MethodSetting {
                id: Some(IdSetting::Text("1".to_string())),
                request: Some(RequestSetting {
                    text: Some(ValueMatcher::from("result")),
                    ..Default::default()
                }),
                response: respond_text("patch result"),
            }],
            ..Default::default()
        }];

        let table = RoutingTable::compile(&lower(&settings).unwrap()).unwrap();
        let matching = MockRequest::new(Method::PATCH, "/targets/1").with_body("result");
        let other = MockRequest::new(Method::PATCH, "/targets/1").with_body("other");
        assert!(table.dispatch(&matching).is_ok());
        assert!(table.dispatch(&other).is_err());
    }

    #[test]
    fn test_missing_response_left_for_compiler() {
        let settings = vec![ResourceSetting {
            name: "targets".to_string(),
            get: vec![MethodSetting {
                id: Some(IdSetting::Text("1".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        }];

        let definitions = lower(&settings).unwrap();
        assert!(matches!(
            RoutingTable::compile(&definitions),
            Err(ConfigurationError::MissingResponse { .. })
        ));
    }

    #[test]
    fn test_bad_regex_is_invalid_matcher() {
        let settings = vec![ResourceSetting {
            name: "targets".to_string(),
            get: vec![MethodSetting {
                request: Some(RequestSetting {
                    queries: [(
                        "page".to_string(),
                        ValueMatcher::Operator(StringMatcher::Matches("([".to_string())),
                    )]
                    .into_iter()
                    .collect(),
                    ..Default::default()
                }),
                response: respond_text("page"),
                ..Default::default()
            }],
            ..Default::default()
        }];

        match lower(&settings) {
            Err(ConfigurationError::InvalidMatcher { path, field, .. }) => {
                assert_eq!(path, "/targets");
                assert_eq!(field, "query 'page'");
            }
            other => panic!("expected InvalidMatcher, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_invalid_response_settings() {
        let bad_status = ResponseSetting {
            status: 42,
            ..Default::default()
        };
        let both_bodies = ResponseSetting {
            text: Some("a".to_string()),
            json: Some(serde_json::json!({})),
            ..Default::default()
        };

        for response in [bad_status, both_bodies] {
            let settings = vec![ResourceSetting {
                name: "targets".to_string(),
                post: vec![MethodSetting {
                    response: Some(response),
                    ..Default::default()
                }],
                ..Default::default()
            }];
            assert!(matches!(
                lower(&settings),
                Err(ConfigurationError::InvalidResponse {
                    method: HttpMethod::Post,
                    ..
                })
            ));
        }
    }
}
