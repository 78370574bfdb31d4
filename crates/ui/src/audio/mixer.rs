//! Slider to gain propagation

use std::rc::Rc;

use studydesk_protocol::{Channel, Volume};
use web_sys::GainNode;

use crate::storage::SettingsRepository;

/// Anything with a live gain value
pub trait GainSink {
    fn set_gain(&self, value: f32);
}

impl GainSink for GainNode {
    fn set_gain(&self, value: f32) {
        self.gain().set_value(value);
    }
}

/// Left/right gains kept in step with the stored volumes
pub struct Mixer<G> {
    repo: Rc<SettingsRepository>,
    left: G,
    right: G,
}

impl<G: GainSink> Mixer<G> {
    pub fn new(repo: Rc<SettingsRepository>, left: G, right: G) -> Self {
        let mixer = Self { repo, left, right };
        mixer.sync();
        mixer
    }

    /// Push stored volumes to both gains
    pub fn sync(&self) {
        self.left.set_gain(self.repo.volume(Channel::Left).get());
        self.right.set_gain(self.repo.volume(Channel::Right).get());
    }

    /// A volume slider moved: persist that channel, then refresh both
    pub fn on_slider(&self, channel: Channel, raw: &str) {
        let volume = Volume::parse(Some(raw));
        if let Err(e) = self.repo.set_volume(channel, volume) {
            tracing::warn!(?channel, error = %e, "volume not persisted");
        }
        self.sync();
    }
}
