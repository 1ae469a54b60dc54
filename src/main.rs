//! chatview demo: a counter view driven from the terminal.

mod console;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use chatview::combine::Publisher;
use chatview::{
    BuildContext, Button, ButtonStyle, Config, DispatchOutcome, Embed, InteractionKind,
    InteractionProvider, LinkButton, Message, MessageProvider, Modal, Observable,
    ObservableObject, Published, Select, SelectOption, TextInput, ViewTracker,
};

use console::{ConsoleChannel, ConsoleCommand, ConsoleInteraction};

/// Drive a reactive counter view from stdin
#[derive(Parser, Debug)]
#[command(name = "chatview-demo")]
#[command(version)]
#[command(about = "Render a counter view to the terminal and dispatch typed client events")]
struct Args {
    /// How the view is delivered
    #[arg(long, value_enum, default_value_t = Delivery::Message)]
    delivery: Delivery,

    /// Fixed prefix for generated custom ids
    #[arg(long)]
    namespace: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Delivery {
    /// Persistent channel message
    Message,
    /// Response to a slash command
    Interaction,
}

struct Counter {
    object: ObservableObject,
    title: Published<String>,
    count: Published<i64>,
    step: Published<i64>,
}

impl Counter {
    fn new() -> Self {
        let object = ObservableObject::new();
        let title = object.published("title", "Counter".to_string());
        let count = object.published("count", 0);
        let step = object.published("step", 1);
        Self {
            object,
            title,
            count,
            step,
        }
    }
}

impl Observable for Counter {
    fn publisher(&self) -> &Publisher {
        self.object.publisher()
    }
}

fn counter_view(counter: Arc<Counter>) -> impl Fn(&mut BuildContext) -> Message + Send + Sync {
    move |cx: &mut BuildContext| {
        cx.observe(&counter);
        let count = counter.count.get();
        let step = counter.step.get();

        let dec = counter.clone();
        let inc = counter.clone();
        let reset = counter.clone();
        let rename = counter.clone();
        let pick = counter.clone();

        Message::new()
            .embed(
                Embed::new()
                    .title(counter.title.get())
                    .description(format!("Count: {}", count))
                    .field("step", step.to_string(), true),
            )
            .item(Button::new(format!("-{}", step)).on_click(move |_| {
                dec.count.update(|n| *n -= dec.step.get());
                async { Ok(()) }
            }))
            .item(Button::new(format!("+{}", step)).on_click(move |_| {
                inc.count.update(|n| *n += inc.step.get());
                async { Ok(()) }
            }))
            .item(
                Button::new("Reset")
                    .style(ButtonStyle::Danger)
                    .disabled(count == 0)
                    .check(move |_| reset.count.get() != 0)
                    .on_click({
                        let counter = counter.clone();
                        move |_| {
                            counter.count.set(0);
                            async { Ok(()) }
                        }
                    }),
            )
            .item(
                Button::new("Rename").style(ButtonStyle::Secondary).modal(
                    Modal::new("Rename counter")
                        .field(TextInput::new("Title").custom_id("title").length(1, 32))
                        .on_submit(move |ctx| {
                            let title = ctx.field("Title").map(|v| v.map(str::to_string));
                            let rename = rename.clone();
                            async move {
                                if let Some(title) = title? {
                                    rename.title.set(title);
                                }
                                Ok::<_, anyhow::Error>(())
                            }
                        }),
                ),
            )
            .item(LinkButton::new("https://docs.rs/chatview", "Docs"))
            .next_row()
            .item(
                Select::new()
                    .custom_id("step")
                    .placeholder("Step size")
                    .options(
                        [1, 5, 10]
                            .into_iter()
                            .map(|n| SelectOption::new(n.to_string()).default(n == step)),
                    )
                    .on_select(move |ctx| {
                        let picked = ctx
                            .selected_options()
                            .map(|options| options.first().map(|o| o.value.clone()));
                        let pick = pick.clone();
                        async move {
                            if let Some(value) = picked? {
                                pick.step.set(value.parse()?);
                            }
                            Ok::<_, anyhow::Error>(())
                        }
                    }),
            )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !chatview::logging::init_tracing() {
        chatview::logging::init_stderr();
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if args.namespace.is_some() {
        config.tracker.id_namespace = args.namespace.clone();
        config.validate()?;
    }

    let counter = Arc::new(Counter::new());
    let view = counter_view(counter.clone());
    let tracker = match args.delivery {
        Delivery::Message => {
            let provider = MessageProvider::new(ConsoleChannel::default());
            ViewTracker::with_config(view, provider, &config).await?
        }
        Delivery::Interaction => {
            let command = Arc::new(ConsoleInteraction::new(InteractionKind::Command, "counter"));
            let provider = InteractionProvider::new(command);
            ViewTracker::with_config(view, provider, &config).await?
        }
    };
    tracing::info!(namespace = tracker.namespace(), "Type 'press <id>', 'select <id> <values..>', 'submit <id> <field>=<value>..' or 'quit'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match ConsoleCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        let Some(interaction) = command.into_interaction() else {
            break;
        };

        match tracker.dispatch(Arc::new(interaction)).await {
            Ok(DispatchOutcome::Unrouted) => eprintln!("no component with that id"),
            Ok(outcome) => tracing::debug!(?outcome, "Event dispatched"),
            Err(err) => eprintln!("dispatch failed: {}", err),
        }
        tracker.flush().await?;
    }

    tracker.stop().await;
    Ok(())
}
