//! Looping animation playback

use super::assets::AnimationClip;

/// Plays one clip in a loop
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    clip: AnimationClip,
    time: f32,
}

impl AnimationMixer {
    pub fn new(clip: AnimationClip) -> Self {
        Self { clip, time: 0.0 }
    }

    /// Advance playback by `delta` seconds, wrapping at the clip end
    pub fn update(&mut self, delta: f64) {
        if self.clip.duration <= 0.0 {
            return;
        }
        self.time = (self.time + delta as f32).rem_euclid(self.clip.duration);
    }

    /// Playback position in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }
}
