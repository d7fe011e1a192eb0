use crate::models::Profile;

/// Check whether two profiles accept each other
///
/// Compatibility is two-way: the requester's preference must accept the
/// candidate's gender AND the candidate's preference must accept the
/// requester's gender. Age plays no role in pairing.
#[inline]
pub fn mutually_compatible(requester: &Profile, candidate: &Profile) -> bool {
    requester.preference.accepts(candidate.gender)
        && candidate.preference.accepts(requester.gender)
}
