//! Generic list/create/update/toggle/delete for every entity kind.
//!
//! # Usage
//!
//! ```bash
//! jb-cli list industries --search tech
//! jb-cli create company-sizes --name Giant --range 5000+
//! jb-cli create users --name "Ada" --email ada@jobs.test --role admin
//! jb-cli update locations 4 --description "Hybrid"
//! jb-cli toggle news 42
//! jb-cli delete roles 7 --yes
//! ```

use clap::Args;
use jobboard_admin::panel::seed_records;
use jobboard_admin::{Change, MutationError, RemoteAdapter};
use jobboard_core::{
    AccountRole, AdminUser, Email, EntityConfig, EntityKind, ManagedEntity, NewsDraft, NewsItem,
    NewsKind, Permission, Record, RecordDraft, RecordId, Role, RoleDraft, UserDraft,
};

use super::{Context, emit};
use crate::backend::Backend;
use crate::error::CliError;

/// Form fields shared by `create` and `update`; each kind reads the ones it
/// understands. On `update`, omitted flags keep the current value.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    /// Display name (title for news items); required for `create`
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Size bracket, company sizes only (e.g. "51-200")
    #[arg(long)]
    pub range: Option<String>,

    /// News link
    #[arg(long)]
    pub link: Option<String>,

    /// News content type (youtube, link, image, banner, ...)
    #[arg(long = "type")]
    pub news_type: Option<NewsKind>,

    /// Publish the news item
    #[arg(long)]
    pub published: bool,

    /// User email
    #[arg(long)]
    pub email: Option<String>,

    /// User account role (`job_seeker`, `employer`, `admin`, `super_admin`)
    #[arg(long)]
    pub role: Option<AccountRole>,

    /// Role permission; repeat for several
    #[arg(long = "permission")]
    pub permissions: Vec<Permission>,
}

/// One operation on one kind.
#[derive(Debug)]
pub enum Action {
    List { search: Option<String> },
    Create(DraftArgs),
    Update { id: String, fields: DraftArgs },
    Toggle { id: String },
    Delete { id: String },
}

impl Action {
    const fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
        }
    }
}

/// How an entity type is built from flags and printed.
pub trait CliEntity: ManagedEntity {
    fn row(&self) -> String;

    /// Build a draft for a new record from the command-line fields.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if a required flag is missing or malformed.
    fn draft(kind: EntityKind, args: &DraftArgs) -> Result<Self::Draft, CliError>;

    /// Edit form for this record: current values with the given flags
    /// applied on top.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if a flag is malformed or not valid for `kind`.
    fn edit(&self, kind: EntityKind, args: &DraftArgs) -> Result<Self::Draft, CliError>;

    /// Starting contents for local-only kinds.
    fn seed(_kind: EntityKind) -> Vec<Self> {
        Vec::new()
    }
}

impl CliEntity for Record {
    fn row(&self) -> String {
        let range = self.details.range().map(|r| format!(" [{r}]")).unwrap_or_default();
        format!(
            "{}\t{}{range}\t{}\t{}",
            self.id,
            self.name,
            self.status,
            self.description.as_deref().unwrap_or("-")
        )
    }

    fn draft(kind: EntityKind, args: &DraftArgs) -> Result<RecordDraft, CliError> {
        check_range(kind, args)?;
        Ok(RecordDraft {
            name: required_name(kind, args)?.to_owned(),
            description: args.description.clone(),
            range: args.range.clone(),
            ..RecordDraft::default()
        })
    }

    fn edit(&self, kind: EntityKind, args: &DraftArgs) -> Result<RecordDraft, CliError> {
        check_range(kind, args)?;
        Ok(RecordDraft {
            name: args.name.clone().unwrap_or_else(|| self.name.clone()),
            description: args.description.clone().or_else(|| self.description.clone()),
            status: self.status,
            range: args
                .range
                .clone()
                .or_else(|| self.details.range().map(str::to_owned)),
        })
    }

    fn seed(kind: EntityKind) -> Vec<Self> {
        seed_records(kind)
    }
}

impl CliEntity for Role {
    fn row(&self) -> String {
        let permissions: Vec<_> = self.permissions.iter().map(|p| p.as_str()).collect();
        format!(
            "{}\t{}\t{} users\t{}",
            self.id,
            self.name,
            self.user_count,
            permissions.join(",")
        )
    }

    fn draft(kind: EntityKind, args: &DraftArgs) -> Result<RoleDraft, CliError> {
        let name = required_name(kind, args)?;
        let mut draft = RoleDraft::new(name, args.permissions.iter().copied());
        draft.description = args.description.clone().unwrap_or_default();
        Ok(draft)
    }

    fn edit(&self, _kind: EntityKind, args: &DraftArgs) -> Result<RoleDraft, CliError> {
        let name = args.name.clone().unwrap_or_else(|| self.name.clone());
        let permissions = if args.permissions.is_empty() {
            self.permissions.clone()
        } else {
            args.permissions.iter().copied().collect()
        };
        let mut draft = RoleDraft::new(name, permissions);
        draft.description = args
            .description
            .clone()
            .unwrap_or_else(|| self.description.clone());
        Ok(draft)
    }
}

impl CliEntity for AdminUser {
    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.id, self.name, self.email, self.role, self.status
        )
    }

    fn draft(kind: EntityKind, args: &DraftArgs) -> Result<UserDraft, CliError> {
        let email = args.email.as_deref().ok_or(CliError::MissingArgument {
            kind: kind.as_str(),
            flag: "--email",
        })?;
        Ok(UserDraft::new(
            required_name(kind, args)?,
            parse_email(email)?,
            args.role.unwrap_or(AccountRole::Admin),
        ))
    }

    fn edit(&self, _kind: EntityKind, args: &DraftArgs) -> Result<UserDraft, CliError> {
        let email = match args.email.as_deref() {
            Some(email) => parse_email(email)?,
            None => self.email.clone(),
        };
        Ok(UserDraft::new(
            args.name.clone().unwrap_or_else(|| self.name.clone()),
            email,
            args.role.unwrap_or(self.role),
        ))
    }
}

impl CliEntity for NewsItem {
    fn row(&self) -> String {
        let state = match (self.published, self.is_active) {
            (true, true) => "live",
            (false, true) => "draft",
            (_, false) => "inactive",
        };
        format!("{}\t{}\t{}\t{state}\t{}", self.id, self.kind, self.title, self.link)
    }

    fn draft(kind: EntityKind, args: &DraftArgs) -> Result<NewsDraft, CliError> {
        let mut draft = NewsDraft::new(
            required_name(kind, args)?,
            args.news_type.unwrap_or_default(),
            args.link.clone().unwrap_or_default(),
        );
        draft.description = args.description.clone().unwrap_or_default();
        draft.published = args.published;
        Ok(draft)
    }

    // Unpublishing goes through `news unpublish`; `--published` only sets it.
    fn edit(&self, _kind: EntityKind, args: &DraftArgs) -> Result<NewsDraft, CliError> {
        Ok(NewsDraft {
            title: args.name.clone().unwrap_or_else(|| self.title.clone()),
            description: args
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            link: args.link.clone().unwrap_or_else(|| self.link.clone()),
            kind: args.news_type.unwrap_or(self.kind),
            thumbnail: self.thumbnail.clone(),
            published: args.published || self.published,
        })
    }
}

fn required_name(kind: EntityKind, args: &DraftArgs) -> Result<&str, CliError> {
    args.name.as_deref().ok_or(CliError::MissingArgument {
        kind: kind.as_str(),
        flag: "--name",
    })
}

fn check_range(kind: EntityKind, args: &DraftArgs) -> Result<(), CliError> {
    if args.range.is_some() && !EntityConfig::default_for(kind).has_range {
        return Err(CliError::Unsupported {
            command: "--range",
            kind: kind.as_str(),
        });
    }
    Ok(())
}

fn parse_email(email: &str) -> Result<Email, CliError> {
    Email::parse(email).map_err(|e| CliError::InvalidValue(e.to_string()))
}

/// Run `action` against the store for `kind`.
///
/// # Errors
///
/// Returns [`CliError`] if the store cannot be opened or the operation fails.
pub async fn run(ctx: &Context, kind: EntityKind, action: Action) -> Result<(), CliError> {
    match kind {
        EntityKind::Industry
        | EntityKind::CompanyType
        | EntityKind::CompanySize
        | EntityKind::JobCategory
        | EntityKind::Location => run_for::<Record>(ctx, kind, action).await,
        EntityKind::Role => run_for::<Role>(ctx, kind, action).await,
        EntityKind::User => run_for::<AdminUser>(ctx, kind, action).await,
        EntityKind::News => run_for::<NewsItem>(ctx, kind, action).await,
    }
}

async fn run_for<T>(ctx: &Context, kind: EntityKind, action: Action) -> Result<(), CliError>
where
    T: CliEntity,
    Backend: RemoteAdapter<T>,
{
    tracing::debug!(kind = %kind, action = action.name(), "Running command");
    let mut store = ctx.open::<T>(kind, T::seed(kind)).await?;

    let change = match action {
        Action::List { search } => {
            let rows = store
                .filtered(search.as_deref().unwrap_or_default())
                .into_iter()
                .map(CliEntity::row);
            emit(rows);
            return Ok(());
        }
        Action::Create(fields) => store.create(T::draft(kind, &fields)?).await?,
        Action::Update { id, fields } => {
            let id = RecordId::new(id);
            let draft = store
                .get(&id)
                .map(|current| current.edit(kind, &fields))
                .transpose()?
                .ok_or_else(|| MutationError::NotFound(id.clone()))?;
            store.update(&id, draft).await?
        }
        Action::Toggle { id } => store.toggle_status(&RecordId::new(id)).await?,
        Action::Delete { id } => store.delete(&RecordId::new(id)).await?,
    };

    report(&change);
    Ok(())
}

/// Print the outcome of a mutation.
pub fn report<T: CliEntity>(change: &Change<T>) {
    let line = match change {
        Change::Created(item) | Change::Updated(item) => item.row(),
        Change::Removed(id) => format!("{id}\tremoved"),
        Change::Promoted(id) => format!("{id}\tfeatured"),
        Change::Declined => "Cancelled".to_string(),
    };
    emit([line]);
}
