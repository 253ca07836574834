//! Album membership commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, UserId};
use keepsake_entity::{AlbumMember, MemberRef};

use super::Credentials;
use crate::output::{self, OutputFormat};

/// Arguments for member commands
#[derive(Debug, Args)]
pub struct MemberArgs {
    #[command(flatten)]
    pub creds: Credentials,

    #[command(subcommand)]
    pub command: MemberCommand,
}

/// Member subcommands
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// List an album's members, owner first
    List {
        /// Album ID
        album: AlbumId,
    },
    /// Invite someone by email
    Add {
        /// Album ID
        album: AlbumId,
        /// Email to invite
        email: String,
    },
    /// Remove a member by user ID or invited email
    Remove {
        /// Album ID
        album: AlbumId,
        /// User ID or email
        member: String,
    },
}

/// Member display row
#[derive(Debug, Serialize, Tabled)]
pub struct MemberRow {
    email: String,
    role: String,
    status: String,
}

impl From<&AlbumMember> for MemberRow {
    fn from(member: &AlbumMember) -> Self {
        Self {
            email: member.email.clone(),
            role: member.role.as_str().to_string(),
            status: if member.user_id.is_some() { "active" } else { "invited" }.to_string(),
        }
    }
}

fn parse_member(raw: &str) -> MemberRef {
    match raw.parse::<UserId>() {
        Ok(user_id) => MemberRef::User(user_id),
        Err(_) => MemberRef::Email(raw.trim().to_lowercase()),
    }
}

pub async fn execute(args: &MemberArgs, config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let (services, _) = super::signed_in(config, &args.creds).await?;

    match &args.command {
        MemberCommand::List { album } => {
            let members = services.albums.list_members(*album).await?;
            let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
            output::print_list(&rows, format);
        }
        MemberCommand::Add { album, email } => {
            let member = services.albums.add_member(*album, email).await?;
            if member.user_id.is_none() {
                output::print_warning(&format!(
                    "No account for {} yet; the invite is pending",
                    member.email
                ));
            }
            output::print_success(&format!("{} added", member.email));
        }
        MemberCommand::Remove { album, member } => {
            if services.albums.remove_member(*album, &parse_member(member)).await? {
                output::print_success(&format!("{member} removed"));
            } else {
                output::print_warning(&format!("{member} is not a member of this album"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        let user_id = UserId::new();
        assert_eq!(parse_member(&user_id.to_string()), MemberRef::User(user_id));
        assert_eq!(
            parse_member(" Guest@Example.com"),
            MemberRef::Email("guest@example.com".into())
        );
    }
}
