/*!
 * On-disk wrapped key store
 *
 * A store directory holds exactly one fixed-size file per internal key
 * identifier, named with the identifier in four-digit uppercase hex.
 * File presence and size are the only commit evidence the crash
 * recovery logic has, so every write is synced to durable storage
 * before it is reported as done.
 */

mod store;

pub use store::*;
