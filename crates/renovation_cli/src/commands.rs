//! Command handlers over the room registry.

use crate::cli::Command;
use anyhow::Context;
use renovation_core::{
    format_size, ChecklistCategory, ExportSnapshot, PhotoBlob, PhotoId, Room, RoomId,
    RoomRegistry, RoomStatus, SqliteStore,
};
use std::io::{BufRead, Write};

pub async fn dispatch(
    command: Command,
    registry: &mut RoomRegistry<SqliteStore>,
) -> anyhow::Result<()> {
    match command {
        Command::List { query } => {
            let rooms = registry.search(query.as_deref().unwrap_or(""));
            for room in &rooms {
                println!("{}", room_line(room));
            }
            println!("{}", header_line(registry, rooms.len()));
        }
        Command::Show { room } => print_room(registry.room(parse_room(&room)?)),
        Command::Summary => {
            let shown = registry.rooms().len();
            println!("{}", header_line(registry, shown));
        }
        Command::Status { room, status } => {
            let room_id = parse_room(&room)?;
            let status: RoomStatus = status.parse()?;
            registry.set_status(room_id, status);
            println!("room {room_id}: {}", status.label());
        }
        Command::Check { room, category } => {
            let room_id = parse_room(&room)?;
            let category: ChecklistCategory = category.parse()?;
            let checked = registry.toggle_check(room_id, category);
            println!("room {room_id}: [{}] {category}", mark(checked));
        }
        Command::Notes { room, text } => {
            let room_id = parse_room(&room)?;
            registry.set_notes(room_id, text);
            println!("room {room_id}: notes updated");
        }
        Command::SampleTask { room } => {
            let room_id = parse_room(&room)?;
            registry.append_sample_task(room_id);
            println!("{}", registry.room(room_id).notes);
        }
        Command::NoWork { room } => {
            let room_id = parse_room(&room)?;
            registry.set_notes_no_work_needed(room_id);
            println!("{}", registry.room(room_id).notes);
        }
        Command::AddPhotos { room, paths } => {
            let room_id = parse_room(&room)?;
            let mut blobs = Vec::with_capacity(paths.len());
            for path in &paths {
                blobs.push(PhotoBlob::from_path(path).await);
            }
            let report = registry.add_photos(room_id, blobs).await;
            for id in &report.added {
                println!("added {id}");
            }
            for failure in &report.failed {
                eprintln!("skipped {}: {}", failure.name, failure.error);
            }
        }
        Command::RemovePhoto { room, photo_id } => {
            let room_id = parse_room(&room)?;
            if registry.remove_photo(room_id, &PhotoId::from(photo_id.as_str())) {
                println!("removed {photo_id}");
            } else {
                println!("no photo {photo_id} in room {room_id}");
            }
        }
        Command::Export { out } => {
            let path = registry
                .export_snapshot()
                .write_to_dir(&out)
                .with_context(|| format!("failed to export into `{}`", out.display()))?;
            println!("exported {}", path.display());
        }
        Command::Import { file } => {
            let snapshot = ExportSnapshot::read_from_file(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            registry.import_snapshot(snapshot)?;
            println!("imported {}", file.display());
        }
        Command::Reset { yes } => {
            if registry.reset_all(|| yes || confirm("Clear all data? This cannot be undone.")) {
                println!("all rooms reset");
            } else {
                println!("reset cancelled");
            }
        }
        Command::Version => println!("renovation_core {}", renovation_core::core_version()),
    }

    Ok(())
}

fn parse_room(value: &str) -> anyhow::Result<RoomId> {
    Ok(value.parse()?)
}

fn mark(checked: bool) -> char {
    if checked {
        'x'
    } else {
        ' '
    }
}

fn header_line(registry: &RoomRegistry<SqliteStore>, shown: usize) -> String {
    let summary = registry.summary();
    format!(
        "{shown} shown • {}/{} done • {} photos • {}%",
        summary.done_count, summary.room_count, summary.photo_count, summary.progress_percent
    )
}

fn room_line(room: &Room) -> String {
    format!(
        "Room {:>2}  {:<11}  checks {:>2}/{}  photos {} ({})",
        room.id.get(),
        room.status.label(),
        room.checklist.checked_count(),
        ChecklistCategory::ALL.len(),
        room.photos.len(),
        format_size(room.photo_bytes())
    )
}

fn print_room(room: &Room) {
    println!("Room {} ({})", room.id, room.status.label());
    for (category, checked) in room.checklist.iter() {
        println!("  [{}] {category}", mark(checked));
    }
    if !room.notes.is_empty() {
        println!("Notes:");
        for line in room.notes.lines() {
            println!("  {line}");
        }
    }
    for photo in &room.photos {
        println!(
            "  photo {} {} ({})",
            photo.id,
            photo.name,
            format_size(photo.size.unwrap_or(0))
        );
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

