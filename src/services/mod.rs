pub mod conversation;
pub mod scenario;

pub use conversation::{ConversationClient, GraphqlConversation};
pub use scenario::{FixedScenario, RandomScenario, Scenario, ScenarioSource, USER_MESSAGES};
