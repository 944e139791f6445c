//! Playable media: the capability every tree participant implements.

use std::fmt;

/// What a participant is, for reporting only. Call sites never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Playlist,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Playlist => "playlist",
        };
        f.write_str(label)
    }
}

/// One observable playback action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    pub kind: MediaKind,
    pub name: String,
}

impl PlaybackEvent {
    pub fn new(kind: MediaKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Playing {}: {}", self.kind, self.name)
    }
}

/// Receives playback events as a tree is performed.
pub trait PlaybackSink {
    fn record(&mut self, event: PlaybackEvent);
}

impl PlaybackSink for Vec<PlaybackEvent> {
    fn record(&mut self, event: PlaybackEvent) {
        self.push(event);
    }
}

/// Capability shared by leaves and playlists.
///
/// A participant only performs its *own* action; fanning out to children is
/// the tree's job, so the same `play` works whether or not a node has children.
pub trait MediaComponent: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> MediaKind;

    /// Whether children may be attached below this participant.
    fn accepts_children(&self) -> bool {
        false
    }

    fn play(&self, sink: &mut dyn PlaybackSink) {
        sink.record(PlaybackEvent::new(self.kind(), self.name()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub name: String,
}

impl AudioFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MediaComponent for AudioFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Audio
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub name: String,
}

impl VideoFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MediaComponent for VideoFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }
}

/// Composite participant. Its members live in the [`MediaTree`](crate::domain::MediaTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MediaComponent for Playlist {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MediaKind {
        MediaKind::Playlist
    }

    fn accepts_children(&self) -> bool {
        true
    }
}
