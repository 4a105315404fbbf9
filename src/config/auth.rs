use std::{env, process::Command};

use derive_getters::Getters;
use log::{error, trace, warn};
use serde::Deserialize;

use crate::api::Auth;

/// Runs `token_cmd` for every request and uses its trimmed stdout.
#[derive(Debug, Deserialize, Getters)]
pub struct CommandAuthConfig {
    token_cmd: String,
}

impl CommandAuthConfig {
    pub fn token(&self) -> Option<String> {
        let mut cmd_parts = self.token_cmd.split_whitespace();
        let Some(program) = cmd_parts.next() else {
            error!("token_cmd does not specify a program");
            return None;
        };
        let mut cmd = Command::new(program);
        cmd.args(cmd_parts);
        trace!("running token_cmd {program}");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                error!("could not run token_cmd: {e}");
                return None;
            }
        };
        if !output.status.success() {
            error!("token_cmd exited with {}", output.status);
            return None;
        }

        let token = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if token.is_empty() {
            warn!("token_cmd printed no token");
            return None;
        }
        Some(token)
    }
}

#[derive(Debug, Deserialize, Getters)]
pub struct EnvAuthConfig {
    var: String,
}

impl EnvAuthConfig {
    pub fn token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct StaticAuthConfig {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum AuthConfig {
    Command(CommandAuthConfig),
    Env(EnvAuthConfig),
    Static(StaticAuthConfig),
}

impl Auth for AuthConfig {
    fn current_token(&self) -> Option<String> {
        match self {
            Self::Command(config) => config.token(),
            Self::Env(config) => config.token(),
            Self::Static(config) => Some(config.token.clone()),
        }
    }
}
