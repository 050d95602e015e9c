/// Identifier for a particle in a [`crate::swarm::ParticleSwarm`].
///
/// Ids are handed out in creation order and never reused within a swarm,
/// so they stay stable across shrinking and regrowing.
pub type ParticleId = u64;
