use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatKind, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use kookie::api::ApiRequester;
use kookie::chatbot::{Command, Features, Mention, TelegramClient};
use kookie::config::ConfigStore;
use kookie::permission::Permission;
use kookie::usage::DailyUsage;

struct BotState {
    features: Features<TelegramClient>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "kookie.json".to_string());
    let store = ConfigStore::new(&config_path);
    let config = store.load()?;

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = tracing_appender::rolling::daily(&log_dir, "kookie.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(filter()),
        )
        .init();

    info!("Starting kookie...");
    info!("Loaded config from {}", store.path().display());
    if config.allowed_groups.is_empty() {
        info!("Answering in every group");
    } else {
        info!("Allowed groups: {:?}", config.allowed_groups);
    }

    let usage = DailyUsage::open(&config.usage_db_path(), config.timezone)?;
    match usage.prune_before(usage.today()) {
        Ok(0) => {}
        Ok(n) => info!("Pruned {n} old usage rows"),
        Err(e) => warn!("Failed to prune usage rows: {e}"),
    }

    let bot = Bot::new(&config.telegram_bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register command menu: {e}");
    }

    let requester = ApiRequester::new(store.clone())?;
    info!("AI chat endpoint: {}", requester.endpoints().ai_chat);

    let features = Features {
        requester: Arc::new(requester),
        sender: Arc::new(TelegramClient::new(bot.clone())),
        permission: Arc::new(Permission::from_config(&config)),
        usage: Arc::new(usage),
        bot_info_path: config.bot_info_path(),
        answer_book_path: config.answer_book_path(),
    };
    let state = Arc::new(BotState { features });

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, state: Arc<BotState>) -> ResponseResult<()> {
    if cmd == Command::Help {
        bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        return Ok(());
    }

    if !matches!(msg.chat.kind, ChatKind::Public(_)) {
        bot.send_message(msg.chat.id, "Kookie 只在群里陪大家玩哦～").await?;
        return Ok(());
    }

    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let caller = Mention {
        user_id: user.id.0,
        display_name: user.username.clone().unwrap_or_else(|| user.first_name.clone()),
    };
    let group_id = msg.chat.id.0;
    let features = &state.features;

    info!("📨 {:?} from {} ({}) in {}", cmd, caller.display_name, caller.user_id, group_id);

    let result = match &cmd {
        // answered above
        Command::Help => return Ok(()),
        Command::LuckyDay => features.lucky_day(&caller, group_id).await,
        Command::Address(args) => features.address(&caller, group_id, args).await,
        Command::Nearby(args) => features.nearby(&caller, group_id, args).await,
        Command::Joke => features.joke(&caller, group_id).await,
        Command::Answer(question) => features.answer(&caller, group_id, question).await,
    };

    match result {
        Ok(outcome) => info!("{:?} for {}: {:?}", cmd, caller.user_id, outcome),
        Err(e) => {
            warn!("{:?} for {} failed: {}", cmd, caller.user_id, e);
            if let Some(text) = e.user_message() {
                bot.send_message(msg.chat.id, text)
                    .reply_parameters(ReplyParameters::new(msg.id))
                    .await?;
            }
        }
    }

    Ok(())
}
