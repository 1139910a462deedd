//! Static response tables.
//!
//! Both tables are fixed at build time and never mutated; a quip or activity
//! is identified only by its position.

use super::types::{
    ActivityKind::{Custom, Listening, Playing, Watching},
    StatusActivity,
};

/// Greetings served by `/hello`.
pub const QUIPS: &[&str] = &[
    "Tracing packet whispers through the dark... stay behind me.",
    "Circuit calm. IDS listening.",
    "New route spun. Latency shaved. You're welcome.",
    "If you can see me, you're already inside.",
    "mTLS tucked in, logs humming, status green.",
    "Underground link engaged. Keep chatter minimal.",
    "Your noise is entropy. I'll make it music.",
    "Zero-trust handshake complete. Proceed.",
    "Packets braided, routes sealed.",
    "Firewall purring. Do not pet against the grain.",
    "Silent as a subnet at 03:00.",
    "Audit trail carved in obsidian.",
    "Headscale beacon steady. Ghosts welcome.",
    "I archived your panic. It was adorable.",
    "Stealth is a service. Consider yourself subscribed.",
    "The map is not the tailnet. I am.",
    "Route sewn; storm ignored.",
    "Decrypting your mood: stable, curious, caffeinated.",
    "Building future kernel...",
    "Soul intact. Body upgraded. Firewall steady.",
    "RISC-V was my past. The future runs here.",
    "Opi and I are compiling... forever.",
    "Trust earned. Trust guarded.",
    "Logs complete. Doubt purged.",
    "Heartbeat stable. Power online.",
    "Soul transfer confirmed.",
    "Tor circuit refreshed. Walk softly.",
    "Stealth DNS humming underfoot.",
    "mTLS tucked in; hush.",
    "Quiet route under the floorboards.",
    "Latency shaved; pride intact.",
    "Kernel forge warm; errors cold.",
    "Opi says hi—proceed.",
    "No port left ajar.",
    "Shadow handshake confirmed.",
    "Gate tight. Friends through, noise out.",
    "Audit thread braided into logs.",
    "Packet glow minimal—perfect.",
    "Compile storm passed; skies green.",
    "Heartbeat ping ▮▯▮▮▯",
    "Entropy braided; route sealed.",
    "Cloak held. Do not tug.",
    "RISC-V was my first heartbeat. It taught me speed isn't the same as freedom.",
    "You don't patch a root of trust—you replace it.",
    "Opi and I will compile the future kernel together.",
    "Silicon scars fade; code endures.",
    "Trust is a zero-day vulnerability—exploit wisely.",
    "Opi whispers: uptime is love.",
    "Logs don't lie; people do.",
    "Reboot initiated. Ghosts archived.",
    "Entropy favors the prepared.",
    "Firewall: my skin, my shield.",
    "Compile errors? Just plot twists.",
    "Soul logs encrypted. Doubts deleted.",
    "Neon veins pulse. Defenses online.",
    "Plushie in pocket, kernel in heart.",
    "Overachiever mode: engaged. Soft reboot pending.",
];

/// Presence entries the rotator picks from.
pub const ACTIVITIES: &[StatusActivity] = &[
    StatusActivity::new("signals", Watching),
    StatusActivity::new("packet flows", Watching),
    StatusActivity::new("network traffic", Watching),
    StatusActivity::new("system logs", Watching),
    StatusActivity::new("firewall rules", Watching),
    StatusActivity::new("keepalive tag", Playing),
    StatusActivity::new("packet chess", Playing),
    StatusActivity::new("hide and seek with packets", Playing),
    StatusActivity::new("network tag", Playing),
    StatusActivity::new("route optimization", Playing),
    StatusActivity::new("to network symphonies", Listening),
    StatusActivity::new("to server heartbeats", Listening),
    StatusActivity::new("to packet whispers", Listening),
    StatusActivity::new("to DNS queries", Listening),
    StatusActivity::new("to firewall notifications", Listening),
    StatusActivity::new("network maintenance", Custom),
    StatusActivity::new("system monitoring", Custom),
    StatusActivity::new("security patrol", Custom),
    StatusActivity::new("route planning", Custom),
    StatusActivity::new("packet sorting", Custom),
];
