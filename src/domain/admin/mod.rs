//! Admin domain - shapes of the resources the staff dashboard reads and edits.
//!
//! These mirror the admin backend's JSON payloads (camelCase on the wire).
//! Optional fields default when absent so older backend deployments decode.

mod conversation;
mod meditation;
mod page;
mod path;
mod staff;
mod stats;
mod user;

pub use conversation::{Conversation, ConversationMessage, ConversationStatus, MessageRole};
pub use meditation::Meditation;
pub use page::{ListQuery, PaginatedResponse, DEFAULT_PAGE_SIZE};
pub use path::{LearningPath, PathDraft, PathPayload, PathStep, PathStepDraft, DEFAULT_PATH_ID};
pub use staff::StaffProfile;
pub use stats::DashboardStats;
pub use user::{EmotionLevel, SubscriptionStatus, UserProfile, UserSummary, UserWithCounts};
