//! Extraction snapshots and the replace-by-name reducer.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::event::ReviewEvent;
use crate::parameter::Parameter;

/// One consistent extraction result: the source text and everything pulled
/// out of it. Rendering always works on a whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub full_text: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Snapshot {
    pub fn new(full_text: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            full_text: full_text.into(),
            parameters,
        }
    }

    /// Length of the text in characters, the unit spans are measured in.
    pub fn text_len(&self) -> usize {
        self.full_text.chars().count()
    }

    /// First parameter with this name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Share of parameters a human has confirmed or corrected, in `[0, 1]`.
    /// An empty snapshot counts as complete.
    pub fn completion(&self) -> f64 {
        if self.parameters.is_empty() {
            return 1.0;
        }
        let confirmed = self.parameters.iter().filter(|p| p.user_confirmed).count();
        confirmed as f64 / self.parameters.len() as f64
    }

    /// Produce the next snapshot after an accepted event.
    ///
    /// Corrections replace the value and mark it confirmed; confirmations
    /// only flip `user_confirmed`; deletions drop the parameter. Every
    /// parameter with the event's name is affected. Unknown names return an
    /// unchanged copy.
    pub fn apply(&self, event: &ReviewEvent) -> Snapshot {
        let name = event.parameter_name();
        if self.get(name).is_none() {
            warn!(parameter = %name, "event for unknown parameter ignored");
            return self.clone();
        }

        let parameters = match event {
            ReviewEvent::Correction(c) => self
                .parameters
                .iter()
                .map(|p| {
                    if p.name == c.parameter_name {
                        Parameter {
                            value: c.new_value.clone(),
                            user_confirmed: true,
                            ..p.clone()
                        }
                    } else {
                        p.clone()
                    }
                })
                .collect(),
            ReviewEvent::Confirm(c) => self
                .parameters
                .iter()
                .map(|p| {
                    if p.name == c.parameter_name {
                        Parameter {
                            user_confirmed: true,
                            ..p.clone()
                        }
                    } else {
                        p.clone()
                    }
                })
                .collect(),
            ReviewEvent::Delete(d) => self
                .parameters
                .iter()
                .filter(|p| p.name != d.parameter_name)
                .cloned()
                .collect(),
        };

        info!(parameter = %name, "applied review event");
        Snapshot {
            full_text: self.full_text.clone(),
            parameters,
        }
    }
}
