use clap::{Args, Subcommand};

use common::prelude::{Ace, PermissionType};

use crate::op::{ContentOpError, Op, OpContext};

/// Parse `user:<name>:<permission>` or `group:<name>:<permission>`.
fn parse_ace(s: &str) -> Result<Ace, String> {
    let mut parts = s.splitn(3, ':');
    let (kind, name, permission) = match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(name), Some(permission)) if !name.is_empty() => {
            (kind, name, permission)
        }
        _ => return Err(format!("expected kind:name:permission, got '{}'", s)),
    };
    let permission: PermissionType = permission.parse()?;
    match kind {
        "user" => Ok(Ace::user(name, permission)),
        "group" => Ok(Ace::group(name, permission)),
        other => Err(format!("unknown principal kind '{}'", other)),
    }
}

#[derive(Args, Debug, Clone)]
pub struct Set {
    /// Location the list is attached to, category locations included
    pub location: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Entry as kind:name:permission, e.g. group:editors:write
    #[arg(long = "ace", value_parser = parse_ace)]
    pub aces: Vec<Ace>,
}

#[async_trait::async_trait]
impl Op for Set {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let acl = conn
            .service
            .set_acl(&self.location, &self.description, self.aces.clone())
            .await?;
        conn.commit()?;

        let entries: Vec<String> = acl
            .aces
            .iter()
            .map(|ace| format!("  {} {}", ace.principal, ace.permission))
            .collect();
        Ok(format!("acl {}\n{}", acl.id, entries.join("\n")))
    }
}

crate::command_enum! {
    (Set, Set),
}

#[derive(Args, Debug, Clone)]
pub struct Acl {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Acl {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
