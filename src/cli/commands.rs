use tracing::info;

use crate::app::{AppContext, HnfeedError, Result};
use crate::cli::FeedArgs;
use crate::comments::{self, CommentsDialog, CommentsState};
use crate::domain::{Comment, Story};
use crate::feed::{execute, DateStepper, FeedDisplay, FeedView, PageRequest};
use crate::format::{date_label, host_from_url, now_millis, strip_html, time_ago, today};

/// Load `args.pages` pages (plus any date lookahead) and return the view.
pub async fn load_feed(ctx: &AppContext, args: &FeedArgs) -> Result<FeedView> {
    if args.pages == 0 {
        return Err(HnfeedError::InvalidArgument("--pages must be at least 1".into()));
    }

    let today = today();
    let mut dates = DateStepper::new(today);
    if let Some(date) = args.date {
        dates.pick(date, today);
    }

    let mut view = FeedView::new(args.kind, dates.selected(), now_millis(), &ctx.config.feed);
    view.set_search(args.search.clone().unwrap_or_default());
    view.set_range(args.range);
    if let Some(sort) = args.sort {
        view.set_sort(sort);
    }

    let first = view.start();
    run_until_idle(ctx, &mut view, Some(first)).await;

    while view.pages().len() < args.pages {
        let Some(request) = view.load_more() else {
            break;
        };
        run_until_idle(ctx, &mut view, Some(request)).await;
    }

    info!(
        "loaded {} {} pages ({} lookahead)",
        view.pages().len(),
        view.kind(),
        view.lookahead_pages()
    );
    Ok(view)
}

async fn run_until_idle(ctx: &AppContext, view: &mut FeedView, mut next: Option<PageRequest>) {
    while let Some(request) = next {
        let response = execute(&ctx.client, request).await;
        next = view.apply(response);
    }
}

pub async fn print_feed(ctx: &AppContext, args: &FeedArgs) -> Result<()> {
    let view = load_feed(ctx, args).await?;
    let now = now_millis();

    match view.display() {
        FeedDisplay::Stories(stories) => {
            for (idx, story) in stories.iter().enumerate() {
                println!("{}", story_line(idx + 1, story, now));
            }
            if view.has_next_page() {
                println!("\n(more available with --pages {})", args.pages + 1);
            }
        }
        FeedDisplay::Failed(e) => return Err(HnfeedError::Other(e)),
        FeedDisplay::NoQualifyingYet { date } => {
            println!(
                "No top stories on {} in the first {} pages",
                date_label(date),
                view.pages().len()
            );
        }
        FeedDisplay::Empty => println!("No stories"),
        FeedDisplay::Loading | FeedDisplay::Searching { .. } => {}
    }

    Ok(())
}

pub async fn print_comments(ctx: &AppContext, story_id: u64, limit: Option<usize>) -> Result<()> {
    let story = ctx
        .client
        .story(story_id)
        .await?
        .ok_or_else(|| HnfeedError::InvalidArgument(format!("{} is not a story", story_id)))?;

    let now = now_millis();
    println!("{}", story_line(1, &story, now));

    let mut dialog = CommentsDialog::new(limit.unwrap_or(ctx.config.feed.comment_limit));
    if let Some(request) = dialog.open_for(story) {
        dialog.apply(comments::execute(&ctx.client, request).await);
    }

    match dialog.state() {
        CommentsState::Loaded(list) if list.is_empty() => println!("\nNo comments"),
        CommentsState::Loaded(list) => {
            for comment in list {
                println!("\n{}", comment_block(comment, now));
            }
        }
        CommentsState::Failed(e) => return Err(HnfeedError::Other(e.clone())),
        CommentsState::Idle | CommentsState::Loading => {}
    }

    Ok(())
}

pub async fn print_picks(ctx: &AppContext) -> Result<()> {
    let picks = ctx.client.best_picks(ctx.config.feed.best_picks).await?;
    if picks.is_empty() {
        println!("No picks");
        return Ok(());
    }

    let now = now_millis();
    for (idx, story) in picks.iter().enumerate() {
        println!("{}", story_line(idx + 1, story, now));
    }
    Ok(())
}

fn story_line(rank: usize, story: &Story, now: i64) -> String {
    let age = story
        .time
        .map(|t| time_ago(t, now))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:>3}. {} ({})\n     {} points by {} {} | {} comments | id {}",
        rank,
        story.title,
        host_from_url(story.url.as_deref()),
        story.score.unwrap_or(0),
        story.author(),
        age,
        story.comment_count(),
        story.id
    )
}

fn comment_block(comment: &Comment, now: i64) -> String {
    let age = comment.time.map(|t| time_ago(t, now)).unwrap_or_default();
    let body = comment.text.as_deref().map(strip_html).unwrap_or_default();

    let mut block = format!("{} {}", comment.author(), age);
    for line in body.lines() {
        block.push('\n');
        if !line.is_empty() {
            block.push_str("  ");
            block.push_str(line);
        }
    }
    block
}
