//! Fixed reference list of tracked servers

use crate::types::ServerEntry;

/// Servers below this population are hidden by the low-population filter
pub const LOW_POP_CUTOFF: u32 = 150_000;

/// Tracked servers in display order, with population estimates
pub const REFERENCE_SERVERS: &[ServerEntry] = &[
    ServerEntry { name: "Twisting Nether", population: 260_000 },
    ServerEntry { name: "Tarren Mill", population: 347_000 },
    ServerEntry { name: "Kazzak", population: 318_000 },
    ServerEntry { name: "Outland", population: 67_000 },
    ServerEntry { name: "Stormscale", population: 414_000 },
    ServerEntry { name: "Burning Blade", population: 124_000 },
    ServerEntry { name: "Draenor", population: 356_000 },
    ServerEntry { name: "Antonidas", population: 184_000 },
    ServerEntry { name: "Tichondrius", population: 222_000 },
    ServerEntry { name: "Sanguino", population: 170_000 },
    ServerEntry { name: "Thrall", population: 139_000 },
    ServerEntry { name: "Hyjal", population: 231_000 },
    ServerEntry { name: "Argent Dawn", population: 196_000 },
    ServerEntry { name: "Grim Batol", population: 67_000 },
    ServerEntry { name: "Blackrock", population: 166_000 },
    ServerEntry { name: "Ragnaros", population: 167_000 },
    ServerEntry { name: "Blackhand", population: 275_000 },
    ServerEntry { name: "Al'Akir", population: 116_000 },
    ServerEntry { name: "Cho'gall", population: 116_000 },
    ServerEntry { name: "Ysondre", population: 84_000 },
    ServerEntry { name: "Eredar", population: 86_000 },
];

/// Position of `name` in `servers` (case-insensitive exact match).
/// Unknown servers get `servers.len()` so they order after every known one.
pub fn order_index(servers: &[ServerEntry], name: &str) -> usize {
    servers
        .iter()
        .position(|s| s.name.eq_ignore_ascii_case(name))
        .unwrap_or(servers.len())
}

/// Whether `name` is exactly one of `servers` (case-insensitive)
pub fn is_known(servers: &[ServerEntry], name: &str) -> bool {
    servers.iter().any(|s| s.name.eq_ignore_ascii_case(name))
}
