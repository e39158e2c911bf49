//! Fixed component catalog and the Ignite draw

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

/// Number of components in every draw
pub const DRAW_SIZE: usize = 3;

/// An electronic part the student must build around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElectronicComponent {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl ElectronicComponent {
    const fn new(name: &'static str, description: &'static str, icon: &'static str) -> Self {
        Self {
            name,
            description,
            icon,
        }
    }
}

pub const CATALOG: [ElectronicComponent; 9] = [
    ElectronicComponent::new("LED", "Light Emitting Diode", "💡"),
    ElectronicComponent::new("Speaker", "Audio Output Device", "🔊"),
    ElectronicComponent::new("LDR", "Light Dependent Resistor", "👁️"),
    ElectronicComponent::new("LCD", "Liquid Crystal Display", "📺"),
    ElectronicComponent::new("Piezo Buzzer", "Piezoelectric Sound Generator", "🔔"),
    ElectronicComponent::new("LM35", "Temperature Sensor", "🌡️"),
    ElectronicComponent::new("555 Timer", "Precision Timer IC", "⏰"),
    ElectronicComponent::new("Servo Motor", "Precise Position Control", "🎯"),
    ElectronicComponent::new("DC Motor", "Direct Current Motor", "⚙️"),
];

/// Draw `DRAW_SIZE` distinct components uniformly, without replacement.
pub fn draw_components<R: Rng + ?Sized>(rng: &mut R) -> Vec<ElectronicComponent> {
    CATALOG.choose_multiple(rng, DRAW_SIZE).copied().collect()
}

/// A selection is valid when it holds exactly `DRAW_SIZE` distinct catalog entries.
pub fn is_valid_selection(components: &[ElectronicComponent]) -> bool {
    let distinct: HashSet<_> = components.iter().collect();
    components.len() == DRAW_SIZE
        && distinct.len() == DRAW_SIZE
        && components.iter().all(|c| CATALOG.contains(c))
}
