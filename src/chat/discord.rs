//! Online mode: a serenity client feeding Discord messages to the command handler
//!
//! serenity runs every gateway event on its own task. Events are pushed onto a
//! queue and handled one at a time by a single worker so commands run in the
//! order they arrived.

use anyhow::Result;
use async_trait::async_trait;
use serenity::Client;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::{AttachmentType, ChannelType, Message};
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::user::User;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, warn};

use crate::chat::{Attachment, Channel, Preview, Sender};
use crate::commands::CommandHandler;

/// Gateway events the bot acts on
enum Inbound {
    Message(Context, Message),
    MemberJoined(Context, Member),
}

/// Discord front end
pub struct DiscordBot {
    handler: Arc<CommandHandler>,
    /// Name of the text channel new members are greeted in
    greeting_channel: String,
}

impl DiscordBot {
    pub fn new(handler: Arc<CommandHandler>, greeting_channel: String) -> Self {
        DiscordBot {
            handler,
            greeting_channel,
        }
    }

    /// Connect to Discord and handle events until Ctrl+C
    ///
    /// # Arguments
    /// * `token` - The bot token
    pub async fn run(self, token: &str) -> Result<()> {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let (queue, incoming) = unbounded_channel();
        let mut client = Client::builder(token, intents)
            .event_handler(GatewayEvents { queue })
            .await?;
        let shard_manager = client.shard_manager.clone();

        // Single consumer: one event at a time, in arrival order
        let worker = tokio::spawn(async move {
            info!("Waiting for messages...");
            drain_in_order(incoming, |event| self.handle_event(event)).await;
        });

        tokio::select! {
            result = client.start() => result?,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                shard_manager.lock().await.shutdown_all().await;
            }
        }

        worker.abort();
        Ok(())
    }

    async fn handle_event(&self, event: Inbound) {
        match event {
            Inbound::Message(ctx, msg) => {
                let bot_id = ctx.cache.current_user_id().to_string();
                let sender = sender_from(&msg.author);
                let channel = DiscordChannel {
                    ctx: &ctx,
                    channel_id: msg.channel_id,
                    reply_to: Some(msg.id),
                };

                self.handler
                    .handle_message(&msg.content, &sender, &bot_id, &channel)
                    .await;
            }
            Inbound::MemberJoined(ctx, member) => self.greet_member(&ctx, &member).await,
        }
    }

    async fn greet_member(&self, ctx: &Context, member: &Member) {
        info!("[JOIN] {} joined guild {}", member.user.name, member.guild_id);

        let channels = match member.guild_id.channels(&ctx.http).await {
            Ok(channels) => channels,
            Err(e) => {
                error!("Failed to list channels of {}: {}", member.guild_id, e);
                return;
            }
        };

        let candidates = channels
            .values()
            .map(|c| (c.id, c.kind, c.name.as_str()));
        let Some(channel_id) = find_greeting_channel(candidates, &self.greeting_channel) else {
            warn!(
                "No #{} channel in guild {}, skipping greeting",
                self.greeting_channel, member.guild_id
            );
            return;
        };

        let channel = DiscordChannel {
            ctx,
            channel_id,
            reply_to: None,
        };
        if let Err(e) = self.handler.greet(&sender_from(&member.user), &channel).await {
            error!("Failed to greet {}: {:#}", member.user.name, e);
        }
    }
}

/// Run `handle` on every queued item, finishing one before starting the next
async fn drain_in_order<T, F, Fut>(mut incoming: UnboundedReceiver<T>, mut handle: F)
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(item) = incoming.recv().await {
        handle(item).await;
    }
}

/// serenity event handler; only enqueues
struct GatewayEvents {
    queue: UnboundedSender<Inbound>,
}

impl GatewayEvents {
    fn enqueue(&self, event: Inbound) {
        if self.queue.send(event).is_err() {
            warn!("Event worker has stopped, dropping event");
        }
    }
}

#[async_trait]
impl EventHandler for GatewayEvents {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Connected as {} ({}) in {} guilds",
            ready.user.name,
            ready.user.id,
            ready.guilds.len()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        self.enqueue(Inbound::Message(ctx, msg));
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        self.enqueue(Inbound::MemberJoined(ctx, new_member));
    }
}

fn sender_from(user: &User) -> Sender {
    Sender {
        id: user.id.to_string(),
        name: user.name.clone(),
        avatar_url: user.face(),
    }
}

/// Pick the guild text channel called `name`
fn find_greeting_channel<'a, I>(channels: I, name: &str) -> Option<ChannelId>
where
    I: IntoIterator<Item = (ChannelId, ChannelType, &'a str)>,
{
    channels
        .into_iter()
        .find(|(_, kind, channel_name)| *kind == ChannelType::Text && *channel_name == name)
        .map(|(id, _, _)| id)
}

/// How a piece of text goes out
#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    /// Discord rejects messages without content
    Skip,
    Send,
    Reply(MessageId),
}

fn plan_delivery(text: &str, reply_to: Option<MessageId>) -> Delivery {
    if text.trim().is_empty() {
        return Delivery::Skip;
    }
    match reply_to {
        Some(id) => Delivery::Reply(id),
        None => Delivery::Send,
    }
}

/// A Discord text channel, optionally tied to the message being answered
struct DiscordChannel<'a> {
    ctx: &'a Context,
    channel_id: ChannelId,
    reply_to: Option<MessageId>,
}

impl DiscordChannel<'_> {
    async fn deliver(&self, text: &str, reply_to: Option<MessageId>) -> Result<()> {
        match plan_delivery(text, reply_to) {
            Delivery::Skip => {
                debug!("Skipping empty message to {}", self.channel_id);
            }
            Delivery::Send => {
                self.channel_id.say(&self.ctx.http, text).await?;
            }
            Delivery::Reply(id) => {
                self.channel_id
                    .send_message(&self.ctx.http, |m| {
                        m.content(text).reference_message((self.channel_id, id))
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Channel for DiscordChannel<'_> {
    async fn reply(&self, text: &str) -> Result<()> {
        self.deliver(text, self.reply_to).await
    }

    async fn send(&self, text: &str) -> Result<()> {
        self.deliver(text, None).await
    }

    async fn send_preview(&self, preview: &Preview) -> Result<()> {
        self.channel_id
            .send_message(&self.ctx.http, |m| {
                m.embed(|e| {
                    e.title(&preview.title).url(&preview.url);
                    if !preview.description.is_empty() {
                        e.description(&preview.description);
                    }
                    if !preview.thumbnail.is_empty() {
                        e.thumbnail(&preview.thumbnail);
                    }
                    e
                })
            })
            .await?;
        Ok(())
    }

    async fn send_attachment(&self, caption: &str, attachment: Attachment) -> Result<()> {
        let file = AttachmentType::Bytes {
            data: Cow::Owned(attachment.data),
            filename: attachment.filename,
        };
        self.channel_id
            .send_message(&self.ctx.http, |m| m.content(caption).add_file(file))
            .await?;
        Ok(())
    }
}
