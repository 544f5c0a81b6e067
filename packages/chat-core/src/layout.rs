//! Layout decisions derived from messages, options and draft state.
//!
//! The rendering layer draws exactly what these structs say; keeping the
//! branching here lets it be tested without a window.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::draft::DraftBuffer;
use crate::message::{Message, MessageId, RenderKey};
use crate::options::ValidatedOptions;

/// Leading margin before a counterpart bubble when its avatar shows.
pub const AVATAR_GUTTER: f32 = 10.0;

/// Horizontal side a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

/// Which palette entry colors the bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleRole {
    User,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    Uri(String),
    /// The bundled empty-avatar image
    Placeholder,
}

/// Mark rendered next to the date of the user's own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMark {
    Sent,
    Seen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    pub alignment: Alignment,
    pub role: BubbleRole,
    pub shows_avatar: bool,
    pub avatar: AvatarSource,
    pub leading_margin: f32,
    /// The row under the body holding the date label and the delivery mark
    pub shows_date_row: bool,
    pub shows_date: bool,
    pub delivery_mark: Option<DeliveryMark>,
    pub press_opacity: bool,
}

impl BubbleLayout {
    pub fn for_message(message: &Message, options: &ValidatedOptions) -> Self {
        let (alignment, role, hide_avatar) = if message.is_user {
            (Alignment::End, BubbleRole::User, options.hide_user_avatar)
        } else {
            (Alignment::Start, BubbleRole::Other, options.hide_other_user_avatar)
        };

        let avatar = match message.avatar.as_deref() {
            Some(uri) if !uri.trim().is_empty() => AvatarSource::Uri(uri.to_string()),
            _ => AvatarSource::Placeholder,
        };

        let leading_margin = if !message.is_user && !options.hide_other_user_avatar {
            AVATAR_GUTTER
        } else {
            0.0
        };

        let delivery_mark = message.is_user.then(|| {
            if message.is_seen() {
                DeliveryMark::Seen
            } else {
                DeliveryMark::Sent
            }
        });

        let shows_date = !options.hide_bubble_date;

        Self {
            alignment,
            role,
            shows_avatar: !hide_avatar,
            avatar,
            leading_margin,
            shows_date_row: shows_date || delivery_mark.is_some(),
            shows_date,
            delivery_mark,
            press_opacity: !options.disable_bubble_press_opacity,
        }
    }
}

/// Which parts of the composer render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerLayout {
    pub shows_top_element: bool,
    pub shows_divider: bool,
    pub shows_input_row: bool,
    pub shows_left_element: bool,
    pub shows_right_element: bool,
    pub shows_send: bool,
}

impl ComposerLayout {
    pub fn compute(options: &ValidatedOptions, draft: &DraftBuffer) -> Self {
        let shows_input_row = !options.hide_input;
        let wants_send = !draft.trimmed_is_empty() || options.always_show_send;

        Self {
            shows_top_element: !options.hide_top_element,
            shows_divider: !options.no_divider,
            shows_input_row,
            shows_left_element: shows_input_row && !options.hide_left_input_element,
            shows_right_element: shows_input_row && !options.hide_right_input_element,
            shows_send: shows_input_row && wants_send && !options.hide_send_button,
        }
    }
}

/// Visual order of a newest-first message sequence, top to bottom.
///
/// The list is inverted: the first element of the input renders at the
/// bottom, so the visual order is the reversal of the input.
pub fn display_order(messages: &[Message]) -> Vec<&Message> {
    messages.iter().rev().collect()
}

/// Identifiers that appear more than once, in order of first repetition.
pub fn duplicate_ids(messages: &[Message]) -> Vec<MessageId> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for message in messages {
        if !seen.insert(message.id) && reported.insert(message.id) {
            duplicates.push(message.id);
        }
    }

    duplicates
}

/// How a completed press on a bubble should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Press,
    LongPress,
}

/// Classifies presses by how long the pointer was held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressGesture {
    threshold: Duration,
}

impl PressGesture {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn classify(&self, held: Duration) -> PressKind {
        if held >= self.threshold {
            PressKind::LongPress
        } else {
            PressKind::Press
        }
    }
}

/// Pointer state of one bubble.
///
/// A long press is reported while the pointer is still held, once the hold
/// timer fires; the release that follows reports nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressTracker {
    gesture: PressGesture,
    pressed_at: Option<Instant>,
}

impl PressTracker {
    pub fn new(gesture: PressGesture) -> Self {
        Self {
            gesture,
            pressed_at: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.gesture.threshold()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn press(&mut self, at: Instant) {
        self.pressed_at = Some(at);
    }

    /// Hold timer fired. Yields a long press if the current press has been
    /// held past the threshold, and ends it.
    pub fn hold_elapsed(&mut self, now: Instant) -> Option<PressKind> {
        let pressed_at = self.pressed_at?;
        match self.gesture.classify(now.saturating_duration_since(pressed_at)) {
            PressKind::LongPress => {
                self.pressed_at = None;
                Some(PressKind::LongPress)
            }
            PressKind::Press => None,
        }
    }

    pub fn release(&mut self, now: Instant) -> Option<PressKind> {
        let pressed_at = self.pressed_at.take()?;
        Some(self.gesture.classify(now.saturating_duration_since(pressed_at)))
    }

    pub fn cancel(&mut self) {
        self.pressed_at = None;
    }
}

/// What a bubble needs when its message is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleChange {
    /// Nothing that renders changed
    Keep,
    /// Text, date or flags changed; the media preview stays
    Refresh,
    /// The attachment changed; the preview is rebuilt
    ReplaceMedia,
    /// No bubble exists for this id yet
    Insert,
}

impl BubbleChange {
    pub fn between(previous: &RenderKey, next: &RenderKey) -> Self {
        if previous == next {
            BubbleChange::Keep
        } else if previous.same_media(next) {
            BubbleChange::Refresh
        } else {
            BubbleChange::ReplaceMedia
        }
    }
}

/// Result of reconciling a message snapshot against the bubbles on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan<'a> {
    /// Rows top to bottom, one per distinct id
    pub rows: Vec<(&'a Message, BubbleChange)>,
    /// Ids on screen that the snapshot no longer holds
    pub removed: Vec<MessageId>,
}

impl ListPlan<'_> {
    pub fn order(&self) -> Vec<MessageId> {
        self.rows.iter().map(|(message, _)| message.id).collect()
    }
}

/// Reconcile a newest-first snapshot against the render keys of the bubbles
/// currently shown. A repeated id keeps its first (newest) occurrence.
pub fn plan_list<'a>(
    messages: &'a [Message],
    existing: &HashMap<MessageId, RenderKey>,
) -> ListPlan<'a> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(messages.len());

    for message in messages {
        if !seen.insert(message.id) {
            continue;
        }
        let change = match existing.get(&message.id) {
            Some(previous) => BubbleChange::between(previous, &message.render_key()),
            None => BubbleChange::Insert,
        };
        rows.push((message, change));
    }
    rows.reverse();

    let mut removed: Vec<MessageId> = existing
        .keys()
        .filter(|id| !seen.contains(*id))
        .copied()
        .collect();
    removed.sort();

    ListPlan { rows, removed }
}
