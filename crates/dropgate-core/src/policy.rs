//! Consent policy.
//!
//! Decides, at the moment an offer arrives, whether the user has to be asked.

/// Outcome of applying the consent policy to a new offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentPolicy {
    /// Accept immediately and only inform the user
    AutoAccept,
    /// Ask the user before accepting
    RequireUserChoice,
}

/// Apply the consent policy.
///
/// Callers pass the setting as read at offer time; nothing is cached here.
#[must_use]
pub const fn decide(auto_accept_enabled: bool) -> ConsentPolicy {
    if auto_accept_enabled {
        ConsentPolicy::AutoAccept
    } else {
        ConsentPolicy::RequireUserChoice
    }
}
