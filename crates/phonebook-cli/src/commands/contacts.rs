use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::photos::release;
use crate::util::{contact_line, or_dash, parse_assignment, parse_contact_id};
use anyhow::Result;
use clap::{ArgAction, Args};
use phonebook_core::domain::{is_mobile, Contact, ContactField, SortColumn};
use phonebook_store::error::StoreError;
use phonebook_store::query::ContactSearch;
use phonebook_store::repo::{ContactNew, ContactUpdate};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long, alias = "group")]
    pub group_name: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Image file to attach (jpg, jpeg, png, gif or bmp)
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long, alias = "group")]
    pub group_name: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Set a field by column name, e.g. --set position=Manager
    #[arg(long = "set", value_name = "FIELD=VALUE", action = ArgAction::Append)]
    pub set: Vec<String>,
    #[arg(long, conflicts_with = "clear_photo")]
    pub photo: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_photo: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Column to sort by; defaults to the configured sort
    #[arg(long)]
    pub sort: Option<SortColumn>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long, alias = "group")]
    pub group_name: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn add_contact(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    ctx.require_admin("add")?;

    let photo_path = match &args.photo {
        Some(source) => Some(ctx.photos.save(source)?),
        None => None,
    };

    let created = ctx.store.contacts().create(ContactNew {
        first_name: args.first_name.unwrap_or_default(),
        last_name: args.last_name.unwrap_or_default(),
        group_name: args.group_name.unwrap_or_default(),
        position: args.position,
        email: args.email,
        phone: args.phone.unwrap_or_default(),
        photo_path: photo_path.clone(),
    });
    let contact = match created {
        Ok(contact) => contact,
        Err(err) => {
            if let Some(stored) = &photo_path {
                release(ctx.photos, stored);
            }
            return Err(err.into());
        }
    };

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("created {} {}", contact.id, contact.full_name());
    }
    Ok(())
}

pub fn edit_contact(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    ctx.require_admin("edit")?;
    let id = parse_contact_id(&args.id)?;

    let pairs = args
        .set
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;
    for (name, _) in &pairs {
        match ContactField::parse(name) {
            None => warn!(field = %name, "ignoring unknown field"),
            Some(ContactField::PhotoPath) => {
                warn!("ignoring photo_path; use --photo or --clear-photo")
            }
            Some(_) => {}
        }
    }
    let mut update = ContactUpdate::from_fields(
        pairs
            .into_iter()
            .filter(|(name, _)| ContactField::parse(name) != Some(ContactField::PhotoPath)),
    );
    let typed = [
        (ContactField::FirstName, args.first_name),
        (ContactField::LastName, args.last_name),
        (ContactField::GroupName, args.group_name),
        (ContactField::Position, args.position),
        (ContactField::Email, args.email),
        (ContactField::Phone, args.phone),
    ];
    for (field, value) in typed {
        if let Some(value) = value {
            update.set(field, value);
        }
    }

    let previous = ctx
        .store
        .contacts()
        .get(id)?
        .ok_or(StoreError::NotFound(id))?;

    let new_photo = match &args.photo {
        Some(source) => Some(ctx.photos.save(source)?),
        None => None,
    };
    if let Some(stored) = &new_photo {
        update.set(ContactField::PhotoPath, stored.clone());
    } else if args.clear_photo {
        update.set(ContactField::PhotoPath, String::new());
    }

    let contact = match ctx.store.contacts().update(id, update) {
        Ok(contact) => contact,
        Err(err) => {
            if let Some(stored) = &new_photo {
                release(ctx.photos, stored);
            }
            return Err(err.into());
        }
    };
    if contact.photo_path != previous.photo_path {
        release(ctx.photos, &previous.photo_path);
    }

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("updated {} {}", contact.id, contact.full_name());
    }
    Ok(())
}

pub fn show_contact(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let contact = ctx
        .store
        .contacts()
        .get(id)?
        .ok_or_else(|| not_found(format!("contact {id}")))?;

    if ctx.json {
        print_json(&contact)?;
        return Ok(());
    }

    println!("id: {}", contact.id);
    for field in ContactField::ALL {
        let value = contact.value(field);
        if field == ContactField::Phone && is_mobile(value) {
            println!("{}: {} (mobile)", field, value);
        } else {
            println!("{}: {}", field, or_dash(value));
        }
    }
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let sort = args.sort.unwrap_or(ctx.config.default_sort);
    let contacts = ctx.store.contacts().list_all(sort)?;
    print_contacts(ctx, &contacts)
}

pub fn search_contacts(ctx: &Context<'_>, args: SearchArgs) -> Result<()> {
    let search = ContactSearch {
        first_name: args.first_name,
        last_name: args.last_name,
        group_name: args.group_name,
        position: args.position,
        email: args.email,
        phone: args.phone,
    };
    let contacts = ctx.store.contacts().search(&search)?;
    print_contacts(ctx, &contacts)
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    ctx.require_admin("delete")?;
    let id = parse_contact_id(&args.id)?;
    let contact = ctx.store.contacts().delete(id)?;
    release(ctx.photos, &contact.photo_path);

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("deleted {} {}", contact.id, contact.full_name());
    }
    Ok(())
}

fn print_contacts(ctx: &Context<'_>, contacts: &[Contact]) -> Result<()> {
    if ctx.json {
        return print_json(&contacts);
    }
    if contacts.is_empty() {
        println!("no contacts");
        return Ok(());
    }
    for contact in contacts {
        println!("{}", contact_line(contact));
    }
    Ok(())
}
