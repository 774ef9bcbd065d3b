pub mod blogs;
pub mod buddies;
pub mod chats;
pub mod groups;
pub mod reviews;
pub mod trips;
pub mod users;

pub use blogs::{Blog, BlogCard, Like, Wishlist, WishlistEntry};
pub use buddies::{BuddyProfile, BuddyRequest, MatchCandidate, PendingRequestRow, RequestStatus};
pub use chats::{Chat, ChatBuddy, ChatMember, ChatMemberInfo, Message, MessageWithSender};
pub use groups::{Group, GroupPost, GroupPostWithAuthor, GroupSummary};
pub use reviews::{BuddyReview, TripReview};
pub use trips::{
    CompletedTripRow, ParticipantInfo, ParticipantRole, TodoItem, Trip, TripCard, TripParticipant,
    TripStatus,
};
pub use users::{AdminUserRow, SafeUser, User, UserType};
