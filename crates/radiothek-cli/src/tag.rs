//! Audio metadata tagging using lofty.

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use std::path::Path;
use tracing::info;

use crate::show::Show;

/// Write ID3v2 frames to a fully downloaded audio file.
///
/// Frame layout:
/// - Title: "Show Title - BroadcastDay"
/// - Artist / Album artist: show title
/// - Album / Year: broadcast year
/// - Front cover: the downloaded cover image, when one exists
pub async fn write_tags(
    audio_path: &Path,
    cover_path: Option<&Path>,
    show: &Show,
) -> Result<()> {
    let path = audio_path.to_path_buf();
    let cover = cover_path.map(Path::to_path_buf);
    let show = show.clone();

    tokio::task::spawn_blocking(move || write_tags_blocking(&path, cover.as_deref(), &show))
        .await
        .context("tag writing task failed")??;

    Ok(())
}

fn write_tags_blocking(audio_path: &Path, cover_path: Option<&Path>, show: &Show) -> Result<()> {
    let mut tag = Tag::new(TagType::Id3v2);

    tag.insert_text(
        ItemKey::TrackTitle,
        format!("{} - {}", show.title, show.broadcast_day),
    );
    tag.insert_text(ItemKey::TrackArtist, show.title.clone());
    tag.insert_text(ItemKey::AlbumArtist, show.title.clone());
    tag.insert_text(ItemKey::AlbumTitle, show.year.clone());
    tag.insert_text(ItemKey::Year, show.year.clone());

    if let Some(cover) = cover_path {
        let artwork = std::fs::read(cover)
            .with_context(|| format!("failed to read artwork {}", cover.display()))?;
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Jpeg),
            Some("Front cover".to_string()),
            artwork,
        );
        tag.push_picture(picture);
        info!("attached cover");
    } else {
        info!("no cover available, skipped image frame");
    }

    tag.save_to_path(audio_path, WriteOptions::default())
        .with_context(|| format!("failed to save tags to {}", audio_path.display()))?;

    Ok(())
}

/// Read tags back from an audio file (used to verify tagging).
pub fn read_tags(audio_path: &Path) -> Result<ReadTags> {
    let tagged_file = Probe::open(audio_path)?
        .read()
        .context("failed to read audio file")?;

    let tag = tagged_file.primary_tag().context("no tag found")?;

    let get_text = |key: &ItemKey| -> Option<String> { tag.get_string(key).map(str::to_string) };

    Ok(ReadTags {
        title: get_text(&ItemKey::TrackTitle),
        artist: get_text(&ItemKey::TrackArtist),
        album: get_text(&ItemKey::AlbumTitle),
        year: get_text(&ItemKey::Year),
        has_picture: !tag.pictures().is_empty(),
    })
}

#[derive(Debug, Clone)]
pub struct ReadTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub has_picture: bool,
}
