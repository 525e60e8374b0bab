pub mod graphql_client;
pub mod request_builder;

pub use graphql_client::GraphqlClient;
pub use request_builder::{ConversationRequest, TurnKind};
