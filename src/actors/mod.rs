mod account_actor;
#[cfg(test)]
mod tests;

pub use account_actor::AccountActor;
pub(crate) use account_actor::{hydrate, persist, restore};
