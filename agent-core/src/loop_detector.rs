//! Loop detector (SPEC_FULL.md §4.9): looks at the last `L` AI message bodies and flags a loop
//! once `T` of them are identical.

use crate::state::MessageLog;

#[derive(Debug, Clone, Copy)]
pub struct LoopDetectorConfig {
    pub lookback: usize,
    pub threshold: usize,
}

impl Default for LoopDetectorConfig {
    fn default() -> Self {
        Self {
            lookback: 8,
            threshold: 4,
        }
    }
}

/// True once any single AI message body repeats `threshold` or more times among the last
/// `lookback` AI messages. Empty-content messages (pure tool-call turns with no text) are
/// excluded, since they repeat trivially and carry no signal.
pub fn detect_loop(log: &MessageLog, config: LoopDetectorConfig) -> bool {
    let recent = log.last_ai_contents(config.lookback);
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for content in recent.iter().filter(|c| !c.is_empty()) {
        let count = counts.entry(content.as_str()).or_insert(0);
        *count += 1;
        if *count >= config.threshold {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn repeating_message_at_threshold_is_detected() {
        let mut log = MessageLog::new();
        for _ in 0..4 {
            log.push(Message::ai("let me click the button again"));
        }
        assert!(detect_loop(&log, LoopDetectorConfig::default()));
    }

    #[test]
    fn distinct_messages_are_not_a_loop() {
        let mut log = MessageLog::new();
        for i in 0..8 {
            log.push(Message::ai(format!("step {i}")));
        }
        assert!(!detect_loop(&log, LoopDetectorConfig::default()));
    }

    #[test]
    fn empty_content_messages_never_count_as_a_loop() {
        let mut log = MessageLog::new();
        for _ in 0..8 {
            log.push(Message::ai(""));
        }
        assert!(!detect_loop(&log, LoopDetectorConfig::default()));
    }

    #[test]
    fn below_threshold_repeats_are_not_a_loop() {
        let mut log = MessageLog::new();
        log.push(Message::ai("same thing"));
        log.push(Message::ai("same thing"));
        log.push(Message::ai("same thing"));
        log.push(Message::ai("different"));
        assert!(!detect_loop(&log, LoopDetectorConfig::default()));
    }
}
