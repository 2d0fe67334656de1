use std::f32::consts::PI;

/// Breathing animation (slower, more organic)
pub fn breathing(time: f32, speed: f32) -> f32 {
    let t = time * speed;
    // Combine multiple sine waves for more organic feel
    let base = (t * PI).sin();
    let harmonic = (t * PI * 2.0).sin() * 0.2;
    (base + harmonic + 1.0) / 2.4 * 0.4 + 0.6
}

/// Heartbeat animation (quick pulse followed by pause)
pub fn heartbeat(time: f32, bpm: f32) -> f32 {
    let period = 60.0 / bpm;
    let t = (time % period) / period;

    if t < 0.1 {
        // First beat
        let x = t / 0.1;
        (x * PI).sin()
    } else if t < 0.2 {
        // First beat down
        let x = (t - 0.1) / 0.1;
        (1.0 - x) * (x * PI).cos().abs()
    } else if t < 0.25 {
        // Second beat
        let x = (t - 0.2) / 0.05;
        (x * PI).sin() * 0.7
    } else {
        // Rest
        0.0
    }
}

/// Number of dots (1 to 3) the typing indicator shows at `time`
pub fn typing_dots(time: f32, dots_per_second: f32) -> usize {
    ((time * dots_per_second).max(0.0) as usize % 3) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breathing_stays_in_range() {
        for i in 0..100 {
            let v = breathing(i as f32 * 0.05, 0.5);
            assert!((0.5..=1.0).contains(&v), "breathing out of range: {}", v);
        }
    }

    #[test]
    fn test_heartbeat_rests_most_of_the_period() {
        // 60 bpm: one beat per second, resting after the first quarter
        assert_eq!(heartbeat(0.5, 60.0), 0.0);
        assert!(heartbeat(0.05, 60.0) > 0.9);
    }

    #[test]
    fn test_typing_dots_cycle() {
        assert_eq!(typing_dots(0.0, 3.0), 1);
        assert_eq!(typing_dots(0.4, 3.0), 2);
        assert_eq!(typing_dots(0.7, 3.0), 3);
        assert_eq!(typing_dots(1.0, 3.0), 1);
    }
}
