use crate::event::{AgentId, AgentStatus};

use super::presence::Presence;
use super::roster;

/// Represents the visual state of an agent on the office floor
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    /// Effective status after the studio-wide override
    pub status: AgentStatus,
    pub presence: Presence,

    /// Animation state
    pub pulse_phase: f32,

    /// Seat on the floor, also used for color fallback
    pub seat: usize,
}

impl Agent {
    pub fn new(id: AgentId, seat: usize) -> Self {
        Self {
            id,
            status: roster::absent_status(),
            presence: Presence::Sleeping,
            pulse_phase: 0.0,
            seat,
        }
    }

    /// Update agent state, restarting the pulse when it wakes up
    pub fn apply(&mut self, status: AgentStatus, presence: Presence) {
        if presence.is_active() && !self.presence.is_active() {
            self.pulse_phase = 0.0;
        }
        self.status = status;
        self.presence = presence;
    }

    /// Update animation state (called every frame)
    pub fn tick(&mut self, dt: f32) {
        if self.presence.is_active() {
            self.pulse_phase = (self.pulse_phase + dt * 3.0) % (2.0 * std::f32::consts::PI);
        }
    }

    /// Get the current brightness multiplier (0.0 to 1.0)
    /// Active agents glow and pulse; sleeping agents stay dim
    pub fn pulse_brightness(&self) -> f32 {
        match self.presence {
            Presence::Active => 0.8 + 0.2 * (self.pulse_phase.sin() * 0.5 + 0.5),
            Presence::Sleeping => 0.4,
        }
    }

    /// Vertical bounce offset in rows, mirroring the avatar bounce animation
    pub fn bounce(&self) -> u16 {
        if self.presence.is_active() && self.pulse_phase.sin() > 0.0 {
            1
        } else {
            0
        }
    }

    /// Whether the speech bubble should be drawn
    pub fn shows_bubble(&self) -> bool {
        self.presence.is_active()
    }
}
