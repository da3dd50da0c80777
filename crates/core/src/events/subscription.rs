// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel pattern matching and subscriptions

/// Pattern for matching channel names
/// Supports:
///   - Exact: "db.common.ConnectionOpening"
///   - Single wildcard: "db.common.*" matches any kind under that prefix
///   - Catch-all: "**" matches every channel
#[derive(Clone, Debug)]
pub struct ChannelPattern(String);

impl ChannelPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Check if this pattern matches a channel name
    pub fn matches(&self, channel: &str) -> bool {
        // Empty pattern matches nothing
        if self.0.is_empty() {
            return false;
        }

        if self.0 == "*" || self.0 == "**" {
            return true;
        }

        let pattern_parts: Vec<&str> = self.0.split('.').collect();
        let channel_parts: Vec<&str> = channel.split('.').collect();

        Self::match_segments(&pattern_parts, &channel_parts)
    }

    fn match_segments(pattern: &[&str], channel: &[&str]) -> bool {
        match (pattern.first(), channel.first()) {
            (None, None) => true,
            (Some(&"**"), _) => true, // ** matches everything remaining
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &channel[1..]),
            (Some(p), Some(c)) if *p == *c => Self::match_segments(&pattern[1..], &channel[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// A subscription to specific channel patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<ChannelPattern>,
    pub description: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<ChannelPattern>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
            description: description.into(),
        }
    }

    /// Subscription to every channel on a listener
    pub fn all(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, vec![ChannelPattern::new("**")], description)
    }

    /// Check if any pattern matches the channel
    pub fn matches(&self, channel: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(channel))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
