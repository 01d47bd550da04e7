use std::future::Future;

use stash_business::{ControllerState, FileController};
use stash_states::Subscription;
use stash_storage::ObjectStore;
use tokio::runtime::Handle;

use crate::utils::file_picker::FilePicker;
use crate::widgets::{PageAction, files_page};

pub struct StashApp<S: ObjectStore> {
    controller: FileController<S>,
    runtime: Handle,
    picker: Box<dyn FilePicker>,
    subscription: Subscription<ControllerState>,
    view: ControllerState,
    mounted: bool,
}

impl<S: ObjectStore> StashApp<S> {
    /// Called once before the first frame.
    ///
    /// Controller operations run on `runtime`; the UI thread only renders
    /// the latest published state.
    pub fn new(controller: FileController<S>, runtime: Handle, picker: Box<dyn FilePicker>) -> Self {
        let subscription = controller.subscribe();
        let view = controller.snapshot();
        Self {
            controller,
            runtime,
            picker,
            subscription,
            view,
            mounted: false,
        }
    }

    /// Requests a repaint of `ctx` whenever the controller publishes a change.
    pub fn repaint_on_change(&self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        let changes = self.controller.subscribe();
        self.runtime.spawn(async move {
            while changes.recv_async().await.is_ok() {
                ctx.request_repaint();
            }
        });
    }

    pub fn controller(&self) -> &FileController<S> {
        &self.controller
    }

    /// State as of the last rendered frame.
    pub fn view(&self) -> &ControllerState {
        &self.view
    }

    /// Draws the page and dispatches whatever the user clicked.
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        if let Some(latest) = self.subscription.try_latest() {
            self.view = latest;
        }

        if !self.mounted {
            self.mounted = true;
            let controller = self.controller.clone();
            self.spawn(ui.ctx(), async move { controller.refresh_listing().await });
        }

        let controller = &self.controller;
        let url_for = |name: &str| controller.public_url(name);
        let action = files_page(ui, &self.view, &url_for);

        if let Some(action) = action {
            self.dispatch(ui.ctx(), action);
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, action: PageAction) {
        log::debug!("Page action: {action:?}");
        match action {
            PageAction::ChooseFile => {
                if let Some(file) = self.picker.pick() {
                    self.controller.select_file(Some(file));
                    ctx.request_repaint();
                }
            }
            PageAction::Upload => {
                let controller = self.controller.clone();
                self.spawn(ctx, async move { controller.upload().await });
            }
            PageAction::Refresh => {
                let controller = self.controller.clone();
                self.spawn(ctx, async move { controller.refresh_listing().await });
            }
        }
    }

    fn spawn(&self, ctx: &egui::Context, op: impl Future<Output = ()> + Send + 'static) {
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            op.await;
            ctx.request_repaint();
        });
    }
}

impl<S: ObjectStore> eframe::App for StashApp<S> {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
