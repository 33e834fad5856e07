use folio_config::Config;
use folio_core_contact_impl::{
    message_log::{MessageLogServiceConfig, MessageLogServiceImpl},
    ContactServiceConfig, ContactServiceImpl,
};
use folio_relay_impl::RelayServiceImpl;
use folio_shared_impl::{id::IdServiceImpl, time::TimeServiceImpl};

use crate::{
    relay,
    ui::{TerminalForm, TerminalStatus},
};

pub type MessageLog<Storage> = MessageLogServiceImpl<Storage>;

pub type Contact<Storage> = ContactServiceImpl<
    RelayServiceImpl,
    MessageLog<Storage>,
    IdServiceImpl,
    TimeServiceImpl,
    TerminalStatus,
    TerminalForm,
>;

pub fn message_log<Storage>(config: &Config, storage: Storage) -> MessageLog<Storage> {
    MessageLogServiceImpl::new(
        storage,
        MessageLogServiceConfig {
            key: config.storage.key.as_str().into(),
            capacity: config.storage.capacity,
        },
    )
}

/// Wire the contact pipeline for a terminal session
pub fn contact<Storage>(
    config: &Config,
    storage: Storage,
    form: TerminalForm,
) -> anyhow::Result<Contact<Storage>> {
    let relay = relay::connect(&config.relay)?;
    let contact_config = ContactServiceConfig {
        service_id: config.relay.service_id.as_str().into(),
        template_id: config.relay.template_id.as_str().into(),
        recipient: config.contact.recipient.clone(),
        status_clear_delay: config.contact.status_clear_delay.into(),
    };

    Ok(ContactServiceImpl::new(
        relay,
        message_log(config, storage),
        IdServiceImpl::default(),
        TimeServiceImpl,
        TerminalStatus::default(),
        form,
        contact_config,
    ))
}
