mod fcm_token;
mod helpers;
mod not_found;
mod notifications;
mod preferences;
mod profile;
