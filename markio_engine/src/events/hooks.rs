use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{EventHandler, EventProducer, Handler, PayoutCreatedEvent, PayoutMismatchEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub payout_created_producer: Vec<EventProducer<PayoutCreatedEvent>>,
    pub payout_mismatch_producer: Vec<EventProducer<PayoutMismatchEvent>>,
}

impl EventProducers {
    pub async fn publish_payout_created(&self, event: PayoutCreatedEvent) {
        for producer in &self.payout_created_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_payout_mismatch(&self, event: PayoutMismatchEvent) {
        for producer in &self.payout_mismatch_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_payout_created: Option<EventHandler<PayoutCreatedEvent>>,
    pub on_payout_mismatch: Option<EventHandler<PayoutMismatchEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_payout_created = hooks.on_payout_created.map(|f| EventHandler::new(buffer_size, f));
        let on_payout_mismatch = hooks.on_payout_mismatch.map(|f| EventHandler::new(buffer_size, f));
        Self { on_payout_created, on_payout_mismatch }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_payout_created {
            result.payout_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_payout_mismatch {
            result.payout_mismatch_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_payout_created {
            debug!("📬️ Starting payout created handler");
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_payout_mismatch {
            debug!("📬️ Starting payout mismatch handler");
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_payout_created: Option<Handler<PayoutCreatedEvent>>,
    pub on_payout_mismatch: Option<Handler<PayoutMismatchEvent>>,
}

impl EventHooks {
    pub fn on_payout_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PayoutCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payout_created = Some(Arc::new(f));
        self
    }

    pub fn on_payout_mismatch<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PayoutMismatchEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payout_mismatch = Some(Arc::new(f));
        self
    }
}
