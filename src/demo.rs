use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::event::{AgentStatus, EventSender, Snapshot, SourceMessage, SYSTEM_AGENT};

// ============================================================================
// STUDIO ROLES
// ============================================================================

/// What one agent says while it works
#[derive(Debug, Clone)]
pub struct StudioRole {
    pub agent: &'static str,
    pub actions: &'static [&'static str],
    pub messages: &'static [&'static str],
}

/// The six demo agents, matching the office roster
const STUDIO_ROLES: [StudioRole; 6] = [
    StudioRole {
        agent: "Creative Director",
        actions: &["Brainstorming", "Writing brief", "Reviewing moodboard"],
        messages: &[
            "Neon koi drifting through a flooded Tokyo alley",
            "Bioluminescent orchids, vaporwave palette",
            "A lighthouse made of stained glass at dusk",
            "Pixel-art bees pollinating a chrome garden",
        ],
    },
    StudioRole {
        agent: "Artist",
        actions: &["Painting", "Sketching", "Upscaling"],
        messages: &[
            "Blocking in the composition",
            "Layering glow passes",
            "Refining the focal point",
            "Rendering final 4K pass",
        ],
    },
    StudioRole {
        agent: "Curator",
        actions: &["Reviewing", "Scoring", "Approved"],
        messages: &[
            "Checking color harmony",
            "Comparing against last 10 drops",
            "Rarity traits look balanced",
            "Quality score 9.1/10",
        ],
    },
    StudioRole {
        agent: "Manager",
        actions: &["Uploading", "Writing metadata", "Minting"],
        messages: &[
            "Pinning image to storage",
            "Committing gallery entry",
            "Setting rarity metadata",
        ],
    },
    StudioRole {
        agent: "Promoter",
        actions: &["Drafting", "Posting", "Scheduling"],
        messages: &[
            "Writing the launch thread",
            "Teaser clip for socials",
            "Lining up collector shout-outs",
        ],
    },
    StudioRole {
        agent: "Analyst",
        actions: &["Analyzing trends", "Crunching numbers", "Reporting"],
        messages: &[
            "Floor price up 4% this week",
            "Best release window: 18:00 UTC",
            "Engagement peaked on the koi series",
        ],
    },
];

// ============================================================================
// PIPELINE STAGES
// ============================================================================

/// One pass of the studio's drop pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Conceive,
    Create,
    Curate,
    Publish,
    Promote,
    Analyze,
    Rest,
}

impl Stage {
    /// Index into `STUDIO_ROLES` of the agent leading this stage
    fn lead(&self) -> Option<usize> {
        match self {
            Stage::Conceive => Some(0),
            Stage::Create => Some(1),
            Stage::Curate => Some(2),
            Stage::Publish => Some(3),
            Stage::Promote => Some(4),
            Stage::Analyze => Some(5),
            Stage::Rest => None,
        }
    }

    /// How many status updates the stage produces
    fn steps(&self) -> u32 {
        match self {
            Stage::Create => 3,
            Stage::Rest => 1,
            _ => 2,
        }
    }

    fn next(&self) -> Self {
        match self {
            Stage::Conceive => Stage::Create,
            Stage::Create => Stage::Curate,
            Stage::Curate => Stage::Publish,
            Stage::Publish => Stage::Promote,
            Stage::Promote => Stage::Analyze,
            Stage::Analyze => Stage::Rest,
            Stage::Rest => Stage::Conceive,
        }
    }
}

// ============================================================================
// TIMING UTILITIES
// ============================================================================

/// Pause between published snapshots
fn step_interval(stage: Stage, rng: &mut StdRng) -> Duration {
    let (min_ms, max_ms) = match stage {
        Stage::Rest => (6000, 9000),
        Stage::Create => (1500, 2500),
        _ => (2000, 4000),
    };
    Duration::from_millis(rng.gen_range(min_ms..max_ms))
}

fn pick<'a>(items: &[&'a str], rng: &mut StdRng) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Status the lead agent publishes for one step of its stage
fn working_status(role: &StudioRole, drop_number: u32, rng: &mut StdRng) -> AgentStatus {
    AgentStatus::new(
        pick(role.actions, rng),
        format!("{} (drop #{})", pick(role.messages, rng), drop_number),
    )
}

/// Full office state where every agent is asleep
fn resting_office(running: bool) -> Snapshot {
    let mut snapshot: Snapshot = STUDIO_ROLES
        .iter()
        .map(|r| (r.agent.to_string(), AgentStatus::new("Sleeping", "")))
        .collect();
    snapshot.insert(
        SYSTEM_AGENT,
        AgentStatus::new(if running { "Running" } else { "Stopped" }, ""),
    );
    snapshot
}

// ============================================================================
// DEMO SNAPSHOT GENERATION
// ============================================================================

/// Publish full office snapshots forever, walking the drop pipeline
pub async fn generate_demo_snapshots(tx: EventSender) {
    let mut rng = StdRng::from_entropy();
    let mut drop_number: u32 = rng.gen_range(1..40);

    if tx.send(SourceMessage::Connected).await.is_err() {
        return;
    }

    // Current state on "connect": a couple of agents mid-task, swallowed by the feed
    let mut office = resting_office(true);
    office.insert("Analyst", working_status(&STUDIO_ROLES[5], drop_number, &mut rng));
    office.insert("Promoter", working_status(&STUDIO_ROLES[4], drop_number, &mut rng));
    if tx.send(SourceMessage::Snapshot(office.clone())).await.is_err() {
        return;
    }

    let mut stage = Stage::Conceive;
    loop {
        tokio::time::sleep(step_interval(stage, &mut rng)).await;

        match stage.lead() {
            Some(lead) => {
                for step in 0..stage.steps() {
                    let role = &STUDIO_ROLES[lead];
                    let status = if stage == Stage::Publish && step + 1 == stage.steps() {
                        AgentStatus::new("Upload Success", format!("Drop #{} is live", drop_number))
                    } else {
                        working_status(role, drop_number, &mut rng)
                    };
                    office.insert(role.agent, status);

                    // Occasionally a second agent chimes in within the same update
                    if rng.gen_bool(0.35) {
                        let other = rng.gen_range(0..STUDIO_ROLES.len());
                        if other != lead {
                            let role = &STUDIO_ROLES[other];
                            office.insert(role.agent, working_status(role, drop_number, &mut rng));
                        }
                    }

                    if tx.send(SourceMessage::Snapshot(office.clone())).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(step_interval(stage, &mut rng)).await;
                }
            }
            None => {
                // Sometimes the whole studio is stopped between drops
                let running = !rng.gen_bool(0.3);
                office = resting_office(running);
                if tx.send(SourceMessage::Snapshot(office.clone())).await.is_err() {
                    return;
                }
                if !running {
                    tokio::time::sleep(step_interval(Stage::Rest, &mut rng)).await;
                    office.insert(SYSTEM_AGENT, AgentStatus::new("Running", ""));
                    if tx.send(SourceMessage::Snapshot(office.clone())).await.is_err() {
                        return;
                    }
                }
                drop_number += 1;
            }
        }

        stage = stage.next();
    }
}
