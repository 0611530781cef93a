use crate::core::capability::{LazyLoadable, LoadState, Requestable};
use crate::core::gateway::Gateway;
use crate::domain::ports::ApiRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelType {
    Text,
    Voice,
    #[default]
    Unknown,
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            1 => ChannelType::Text,
            2 => ChannelType::Voice,
            _ => ChannelType::Unknown,
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(value: ChannelType) -> Self {
        match value {
            ChannelType::Text => 1,
            ChannelType::Voice => 2,
            ChannelType::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub is_category: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(rename = "user_id", default)]
    pub master_id: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub identify_num: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub bot: bool,
}

/// A text or voice channel. Built from an id alone, e.g. off an incoming message.
#[derive(Debug, Clone)]
pub struct Channel {
    gate: Arc<Gateway>,
    state: LoadState,
    info: ChannelInfo,
}

impl Channel {
    pub fn new(id: impl Into<String>, gate: Arc<Gateway>) -> Self {
        Self {
            gate,
            state: LoadState::new(),
            info: ChannelInfo {
                id: id.into(),
                ..ChannelInfo::default()
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &ChannelInfo {
        &self.info
    }

    /// The guild this channel belongs to, unloaded and sharing this channel's gate.
    /// `None` until the channel itself has been loaded.
    pub fn guild(&self) -> Option<Guild> {
        if self.info.guild_id.is_empty() {
            return None;
        }
        Some(Guild::new(self.info.guild_id.clone(), self.gate.clone()))
    }
}

impl Requestable for Channel {
    fn gate(&self) -> &Arc<Gateway> {
        &self.gate
    }
}

#[async_trait]
impl LazyLoadable for Channel {
    async fn load(&mut self) -> Result<()> {
        let request = ApiRequest::get("channel/view").query("target_id", self.id());
        let mut info: ChannelInfo = self.gate.exec_req_as(request).await?;
        if info.id.is_empty() {
            info.id = self.info.id.clone();
        }
        self.info = info;
        self.state.mark_loaded();
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }
}

#[derive(Debug, Clone)]
pub struct Guild {
    gate: Arc<Gateway>,
    state: LoadState,
    info: GuildInfo,
}

impl Guild {
    pub fn new(id: impl Into<String>, gate: Arc<Gateway>) -> Self {
        Self {
            gate,
            state: LoadState::new(),
            info: GuildInfo {
                id: id.into(),
                ..GuildInfo::default()
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &GuildInfo {
        &self.info
    }

    /// The guild owner, unloaded. `None` until the guild has been loaded.
    pub fn master(&self) -> Option<User> {
        if self.info.master_id.is_empty() {
            return None;
        }
        Some(User::new(self.info.master_id.clone(), self.gate.clone()))
    }
}

impl Requestable for Guild {
    fn gate(&self) -> &Arc<Gateway> {
        &self.gate
    }
}

#[async_trait]
impl LazyLoadable for Guild {
    async fn load(&mut self) -> Result<()> {
        let request = ApiRequest::get("guild/view").query("guild_id", self.id());
        let mut info: GuildInfo = self.gate.exec_req_as(request).await?;
        if info.id.is_empty() {
            info.id = self.info.id.clone();
        }
        self.info = info;
        self.state.mark_loaded();
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }
}

#[derive(Debug, Clone)]
pub struct User {
    gate: Arc<Gateway>,
    state: LoadState,
    info: UserInfo,
}

impl User {
    pub fn new(id: impl Into<String>, gate: Arc<Gateway>) -> Self {
        Self {
            gate,
            state: LoadState::new(),
            info: UserInfo {
                id: id.into(),
                ..UserInfo::default()
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn info(&self) -> &UserInfo {
        &self.info
    }
}

impl Requestable for User {
    fn gate(&self) -> &Arc<Gateway> {
        &self.gate
    }
}

#[async_trait]
impl LazyLoadable for User {
    async fn load(&mut self) -> Result<()> {
        let request = ApiRequest::get("user/view").query("user_id", self.id());
        let mut info: UserInfo = self.gate.exec_req_as(request).await?;
        if info.id.is_empty() {
            info.id = self.info.id.clone();
        }
        self.info = info;
        self.state.mark_loaded();
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpRequester;
    use crate::adapters::replay::LineReceiver;
    use crate::config::TokenType;
    use crate::utils::error::KhlError;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gate_for(server: &MockServer) -> Arc<Gateway> {
        let requester =
            HttpRequester::new(reqwest::Client::new(), &server.base_url(), TokenType::Bot, "t");
        let empty: &'static [u8] = b"";
        Gateway::new(requester, LineReceiver::new(empty)).shared()
    }

    #[test]
    fn test_channel_type_codes() {
        let info: ChannelInfo = serde_json::from_value(json!({ "id": "1", "type": 2 })).unwrap();
        assert_eq!(info.channel_type, ChannelType::Voice);

        let info: ChannelInfo = serde_json::from_value(json!({ "id": "1", "type": 9 })).unwrap();
        assert_eq!(info.channel_type, ChannelType::Unknown);

        let value = serde_json::to_value(ChannelInfo {
            channel_type: ChannelType::Text,
            ..ChannelInfo::default()
        })
        .unwrap();
        assert_eq!(value["type"], 1);
    }

    #[tokio::test]
    async fn test_channel_load_populates_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/channel/view")
                    .query_param("target_id", "5001");
                then.status(200).json_body(json!({
                    "code": 0,
                    "message": "ok",
                    "data": {
                        "id": "5001",
                        "name": "general",
                        "guild_id": "9001",
                        "topic": "chit chat",
                        "type": 1,
                        "is_category": false
                    }
                }));
            })
            .await;

        let mut channel = Channel::new("5001", gate_for(&server));
        assert!(!channel.is_loaded());
        assert!(channel.guild().is_none());

        channel.load().await.unwrap();

        mock.assert_async().await;
        assert!(channel.is_loaded());
        assert_eq!(channel.info().name, "general");
        assert_eq!(channel.info().topic, "chit chat");
        assert_eq!(channel.info().channel_type, ChannelType::Text);

        let guild = channel.guild().unwrap();
        assert_eq!(guild.id(), "9001");
        assert!(!guild.is_loaded());
        assert!(Arc::ptr_eq(guild.gate(), channel.gate()));
    }

    #[tokio::test]
    async fn test_channel_load_not_found_keeps_unloaded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/channel/view");
                then.status(404);
            })
            .await;

        let mut channel = Channel::new("404", gate_for(&server));
        let err = channel.load().await.unwrap_err();

        assert!(matches!(err, KhlError::NotFound { ref route } if route == "channel/view"));
        assert!(!channel.is_loaded());
        assert_eq!(channel.id(), "404");
        assert!(channel.info().name.is_empty());
    }

    #[tokio::test]
    async fn test_guild_load_and_master() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/guild/view")
                    .query_param("guild_id", "9001");
                then.status(200).json_body(json!({
                    "code": 0,
                    "message": "ok",
                    "data": {
                        "id": "9001",
                        "name": "Rustaceans",
                        "topic": "",
                        "user_id": "7",
                        "icon": "https://img.example/icon.png",
                        "region": "beijing",
                        "channels": []
                    }
                }));
            })
            .await;
        let user_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/user/view")
                    .query_param("user_id", "7");
                then.status(200).json_body(json!({
                    "code": 0,
                    "message": "ok",
                    "data": { "id": "7", "username": "ferris", "identify_num": "0001", "bot": false }
                }));
            })
            .await;

        let mut guild = Guild::new("9001", gate_for(&server));
        guild.ensure_loaded().await.unwrap();
        assert_eq!(guild.info().name, "Rustaceans");
        assert_eq!(guild.info().master_id, "7");

        let mut master = guild.master().unwrap();
        assert!(!master.is_loaded());
        master.load().await.unwrap();

        user_mock.assert_async().await;
        assert!(master.is_loaded());
        assert_eq!(master.info().username, "ferris");
        assert!(!master.info().bot);
    }

    #[tokio::test]
    async fn test_user_load_api_error_keeps_unloaded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/user/view");
                then.status(200)
                    .json_body(json!({ "code": 40000, "message": "user not found", "data": {} }));
            })
            .await;

        let mut user = User::new("1", gate_for(&server));
        let err = user.ensure_loaded().await.unwrap_err();

        assert!(matches!(err, KhlError::Api { code: 40000, .. }));
        assert!(!user.is_loaded());
    }
}
