//! Plain representations of the snapgram entities, as handed to clients.
//!
//! These types only carry what may leave the database. None of them has room
//! for a credential.

extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod comments;
pub mod followers;
pub mod medias;
pub mod posts;
pub mod users;
