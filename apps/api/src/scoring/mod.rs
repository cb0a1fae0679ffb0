// Resume scoring: registry → mapper → invoker, fanned out per aspect.
// All model calls go through llm_client::StructuredModel.

pub mod breakdown;
pub mod handlers;
pub mod invoker;
pub mod mapper;
pub mod pipeline;
pub mod prompts;
pub mod registry;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod test_support;
