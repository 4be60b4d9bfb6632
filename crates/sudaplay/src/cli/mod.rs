pub mod app;
mod inspect;
mod list;
mod play;
mod publish;
mod rate;
mod remove;
mod upload;

use sudaplay_catalog::ContentRecord;
use sudaplay_catalog::play::PlayTarget;

fn print_record(record: &ContentRecord) {
    let status = if record.is_web_playable {
        "playable"
    } else if record.external_url.is_some() {
        "external"
    } else {
        "unpublished"
    };
    println!(
        "#{:<5} {:<32} {:<13} {:<11} {} ({} votes), {} views, {} downloads",
        record.id,
        record.title,
        record.genre.slug(),
        status,
        record.rating,
        record.rating_votes,
        record.views,
        record.downloads,
    );
}

fn print_target(target: &PlayTarget) {
    match target.url() {
        Some(url) => println!("{}: {url}", target.mode()),
        None => println!("{}", target.mode()),
    }
}
