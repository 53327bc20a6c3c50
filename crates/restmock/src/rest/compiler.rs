//! Resource tree to routing table compilation.
//!
//! Pre-order walk: a resource's own handlers are emitted first, grouped by
//! method in `HttpMethod` order and in declaration order within a method,
//! then each sub-resource in declaration order. The resulting sequence is the
//! match precedence of the routing table.

use super::definition::{MethodHandlerDefinition, ResourceDefinition};
use super::error::ConfigurationError;
use super::route::CompiledRoute;
use super::table::RoutingTable;
use crate::predicate::{IdentifierMatcher, PathPattern};

/// Compile every resource in order. Fails on the first invalid definition.
pub fn compile(resources: &[ResourceDefinition]) -> Result<RoutingTable, ConfigurationError> {
    let mut routes = Vec::new();
    for resource in resources {
        compile_resource(resource, &PathPattern::new(), &mut routes)?;
    }
    Ok(RoutingTable::new(routes))
}

fn compile_resource(
    resource: &ResourceDefinition,
    prefix: &PathPattern,
    routes: &mut Vec<CompiledRoute>,
) -> Result<(), ConfigurationError> {
    validate_name(&resource.name, prefix)?;
    let collection = prefix.clone().literal(&resource.name);

    for definitions in resource.handlers.values() {
        for (index, definition) in definitions.iter().enumerate() {
            routes.push(compile_handler(resource, &collection, definition, index)?);
        }
    }

    for sub in &resource.sub_resources {
        let parent_id = sub
            .parent_id
            .clone()
            .ok_or_else(|| ConfigurationError::MissingParentId {
                resource: sub.resource.name.clone(),
                parent: collection.to_string(),
            })?;
        validate_identifier(&parent_id, &collection)?;

        let instance = collection.clone().identifier(&resource.name, parent_id);
        compile_resource(&sub.resource, &instance, routes)?;
    }

    Ok(())
}

fn compile_handler(
    resource: &ResourceDefinition,
    collection: &PathPattern,
    definition: &MethodHandlerDefinition,
    index: usize,
) -> Result<CompiledRoute, ConfigurationError> {
    let handler =
        definition
            .response
            .clone()
            .ok_or_else(|| ConfigurationError::MissingResponse {
                path: collection.to_string(),
                method: definition.method,
                index,
            })?;

    let pattern = match &definition.identifier {
        None => collection.clone(),
        Some(identifier) => {
            validate_identifier(identifier, collection)?;
            collection
                .clone()
                .identifier(&resource.name, identifier.clone())
        }
    };

    Ok(CompiledRoute::new(
        definition.method,
        pattern,
        definition.extra_predicate.clone(),
        handler,
    ))
}

fn validate_name(name: &str, parent: &PathPattern) -> Result<(), ConfigurationError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('/') {
        "name contains '/'"
    } else {
        return Ok(());
    };

    Err(ConfigurationError::InvalidName {
        parent: parent.to_string(),
        name: name.to_string(),
        reason,
    })
}

/// An empty exact identifier could never match a request segment.
fn validate_identifier(
    identifier: &IdentifierMatcher,
    collection: &PathPattern,
) -> Result<(), ConfigurationError> {
    match identifier {
        IdentifierMatcher::Exact(value) if value.is_empty() => {
            Err(ConfigurationError::EmptyIdentifier {
                path: collection.to_string(),
            })
        }
        _ => Ok(()),
    }
}
