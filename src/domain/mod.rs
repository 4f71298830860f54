mod notification;
mod preferences;
mod push_token;
mod user_id;
mod user_record;

pub use notification::*;
pub use preferences::*;
pub use push_token::PushToken;
pub use user_id::UserId;
pub use user_record::*;
