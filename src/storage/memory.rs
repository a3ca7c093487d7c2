// In-memory store used by tests and the demo backend.
//
// All state sits behind one async mutex. A checkout runs entirely under that
// lock: deductions are checked and staged first, then the number is
// allocated, and only then is anything written. A failing step therefore
// leaves the state exactly as it was.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::core::{money, AppError, Result};
use crate::modules::appointments::models::{
    Appointment, AppointmentStatus, NewAppointment, UpdateAppointmentRequest,
};
use crate::modules::appointments::repositories::AppointmentRepository;
use crate::modules::catalog::models::{NewWashService, UpdateWashServiceRequest, WashService};
use crate::modules::catalog::repositories::WashServiceRepository;
use crate::modules::inventory::models::{
    next_service_code, InventoryItem, NewInventoryItem, StockDeduction,
    UpdateInventoryItemRequest,
};
use crate::modules::inventory::repositories::InventoryRepository;
use crate::modules::invoices::models::{
    Invoice, InvoiceDraft, InvoiceItem, InvoiceNumber, InvoiceStatus, InvoiceWithItems,
};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::reports::models::{CompletedVisit, ReportRange};
use crate::modules::reports::repositories::ReportRepository;

pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    prefix: String,
    last_invoice_sequence: u32,
    next_invoice_id: i64,
    next_invoice_item_id: i64,
    next_inventory_id: i64,
    next_appointment_id: i64,
    next_service_id: i64,
    invoices: BTreeMap<i64, Invoice>,
    invoice_items: BTreeMap<i64, Vec<InvoiceItem>>,
    inventory: BTreeMap<i64, InventoryItem>,
    appointments: BTreeMap<i64, Appointment>,
    services: BTreeMap<i64, WashService>,
}

impl MemoryStore {
    /// Empty store numbering invoices under `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState::empty(prefix.into())),
        }
    }

    /// Store preloaded with the shop's standard washes and supplies
    pub fn with_demo_catalog(prefix: impl Into<String>) -> Result<Self> {
        let mut state = MemoryState::empty(prefix.into());
        for item in demo_catalog() {
            state.insert_inventory(item)?;
        }
        for service in demo_menu() {
            let id = MemoryState::take_id(&mut state.next_service_id);
            state.services.insert(id, service.into_service(id));
        }

        Ok(Self {
            state: Mutex::new(state),
        })
    }
}

impl MemoryState {
    fn empty(prefix: String) -> Self {
        Self {
            prefix,
            last_invoice_sequence: 0,
            next_invoice_id: 1,
            next_invoice_item_id: 1,
            next_inventory_id: 1,
            next_appointment_id: 1,
            next_service_id: 1,
            invoices: BTreeMap::new(),
            invoice_items: BTreeMap::new(),
            inventory: BTreeMap::new(),
            appointments: BTreeMap::new(),
            services: BTreeMap::new(),
        }
    }

    fn take_id(counter: &mut i64) -> i64 {
        let id = *counter;
        *counter += 1;
        id
    }

    fn allocate_number(&mut self) -> Result<InvoiceNumber> {
        let number = InvoiceNumber::after(&self.prefix, self.last_invoice_sequence)?;
        self.last_invoice_sequence = number.sequence();
        Ok(number)
    }

    /// Check every deduction against current stock without touching it.
    /// Returns the new quantity of each affected product.
    fn stage_deductions(&self, deductions: &[StockDeduction]) -> Result<BTreeMap<i64, i32>> {
        let mut remaining: BTreeMap<i64, i32> = BTreeMap::new();

        for deduction in deductions {
            let item = self.active_item(deduction.inventory_id)?;
            if item.is_service {
                continue;
            }

            let on_hand = remaining
                .get(&item.id)
                .copied()
                .unwrap_or_else(|| item.on_hand());
            if on_hand < deduction.quantity {
                return Err(AppError::insufficient_stock(
                    &item.name,
                    deduction.quantity,
                    on_hand,
                ));
            }
            remaining.insert(item.id, on_hand - deduction.quantity);
        }

        Ok(remaining)
    }

    fn apply_stock(&mut self, staged: BTreeMap<i64, i32>) {
        for (id, quantity) in staged {
            if let Some(item) = self.inventory.get_mut(&id) {
                item.quantity = Some(quantity);
            }
        }
    }

    fn active_item(&self, id: i64) -> Result<&InventoryItem> {
        self.inventory
            .get(&id)
            .filter(|item| item.active)
            .ok_or_else(|| AppError::not_found(format!("Inventory item {} not found", id)))
    }

    fn ensure_barcode_free(&self, barcode: Option<&str>, owner: Option<i64>) -> Result<()> {
        let Some(barcode) = barcode else {
            return Ok(());
        };

        let taken = self
            .inventory
            .values()
            .any(|item| item.barcode.as_deref() == Some(barcode) && Some(item.id) != owner);
        if taken {
            return Err(AppError::validation(format!(
                "Barcode '{}' is already in use",
                barcode
            )));
        }
        Ok(())
    }

    fn insert_inventory(&mut self, mut item: NewInventoryItem) -> Result<InventoryItem> {
        if item.needs_service_code() {
            let code = next_service_code(
                self.inventory
                    .values()
                    .filter(|existing| existing.is_service)
                    .filter_map(|existing| existing.barcode.as_deref()),
            );
            item.barcode = Some(code);
        }
        self.ensure_barcode_free(item.barcode.as_deref(), None)?;

        let id = Self::take_id(&mut self.next_inventory_id);
        let item = item.into_item(id);
        self.inventory.insert(id, item.clone());
        Ok(item)
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn create(
        &self,
        draft: &InvoiceDraft,
        deductions: &[StockDeduction],
    ) -> Result<InvoiceWithItems> {
        let mut state = self.state.lock().await;

        let staged = state.stage_deductions(deductions)?;
        let number = state.allocate_number()?;

        state.apply_stock(staged);

        let invoice_id = MemoryState::take_id(&mut state.next_invoice_id);
        let invoice = draft.into_invoice(invoice_id, number.to_string(), Utc::now());

        let items: Vec<InvoiceItem> = draft
            .items
            .iter()
            .cloned()
            .map(|item| {
                let id = MemoryState::take_id(&mut state.next_invoice_item_id);
                item.into_item(id, invoice_id)
            })
            .collect();

        state.invoices.insert(invoice_id, invoice.clone());
        state.invoice_items.insert(invoice_id, items.clone());

        Ok(InvoiceWithItems { invoice, items })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InvoiceWithItems>> {
        let state = self.state.lock().await;

        Ok(state.invoices.get(&id).map(|invoice| InvoiceWithItems {
            invoice: invoice.clone(),
            items: state.invoice_items.get(&id).cloned().unwrap_or_default(),
        }))
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let state = self.state.lock().await;

        let mut invoices: Vec<Invoice> = state.invoices.values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(invoices)
    }

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice> {
        let mut state = self.state.lock().await;

        let invoice = state
            .invoices
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

        if !invoice.status.can_transition_to(status) {
            return Err(AppError::validation(format!(
                "Cannot change invoice {} from {} to {}",
                invoice.number, invoice.status, status
            )));
        }

        invoice.status = status;
        Ok(invoice.clone())
    }

    async fn next_invoice_number(&self) -> Result<InvoiceNumber> {
        self.state.lock().await.allocate_number()
    }
}

#[async_trait]
impl InventoryRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().await;

        let mut items: Vec<InventoryItem> = state
            .inventory
            .values()
            .filter(|item| item.active)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InventoryItem>> {
        Ok(self.state.lock().await.inventory.get(&id).cloned())
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>> {
        let state = self.state.lock().await;

        Ok(state
            .inventory
            .values()
            .find(|item| item.active && item.barcode.as_deref() == Some(barcode))
            .cloned())
    }

    async fn create(&self, item: NewInventoryItem) -> Result<InventoryItem> {
        self.state.lock().await.insert_inventory(item)
    }

    async fn update(&self, id: i64, changes: &UpdateInventoryItemRequest) -> Result<InventoryItem> {
        let mut state = self.state.lock().await;

        let mut item = state
            .inventory
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Inventory item {} not found", id)))?;

        changes.apply_to(&mut item);
        state.ensure_barcode_free(item.barcode.as_deref(), Some(id))?;

        state.inventory.insert(id, item.clone());
        Ok(item)
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().await;

        let item = state
            .inventory
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Inventory item {} not found", id)))?;
        item.active = false;
        Ok(())
    }

    async fn reduce_stock(&self, deduction: StockDeduction) -> Result<InventoryItem> {
        let mut state = self.state.lock().await;

        let staged = state.stage_deductions(&[deduction])?;
        state.apply_stock(staged);

        state.active_item(deduction.inventory_id).cloned()
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Appointment>> {
        let state = self.state.lock().await;

        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| date.map_or(true, |d| a.date == d))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));
        Ok(appointments)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        Ok(self.state.lock().await.appointments.get(&id).cloned())
    }

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut state = self.state.lock().await;

        let id = MemoryState::take_id(&mut state.next_appointment_id);
        let appointment = appointment.into_appointment(id, Utc::now());
        state.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn update(&self, id: i64, changes: &UpdateAppointmentRequest) -> Result<Appointment> {
        let mut state = self.state.lock().await;

        let mut appointment = state
            .appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Appointment {} not found", id)))?;

        changes.apply_to(&mut appointment)?;
        state.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state
            .lock()
            .await
            .appointments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Appointment {} not found", id)))
    }
}

#[async_trait]
impl WashServiceRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<WashService>> {
        let state = self.state.lock().await;

        let mut services: Vec<WashService> =
            state.services.values().filter(|s| s.active).cloned().collect();
        services.sort_by(|a, b| (a.price, &a.name, a.id).cmp(&(b.price, &b.name, b.id)));
        Ok(services)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WashService>> {
        Ok(self.state.lock().await.services.get(&id).cloned())
    }

    async fn create(&self, service: NewWashService) -> Result<WashService> {
        let mut state = self.state.lock().await;

        let id = MemoryState::take_id(&mut state.next_service_id);
        let service = service.into_service(id);
        state.services.insert(id, service.clone());
        Ok(service)
    }

    async fn update(&self, id: i64, changes: &UpdateWashServiceRequest) -> Result<WashService> {
        let mut state = self.state.lock().await;

        let service = state
            .services
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Service {} not found", id)))?;
        changes.apply_to(service)?;
        Ok(service.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state
            .lock()
            .await
            .services
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Service {} not found", id)))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn revenue_between(&self, range: &ReportRange) -> Result<Decimal> {
        let state = self.state.lock().await;

        let revenue = state
            .invoices
            .values()
            .filter(|invoice| range.contains(invoice.date))
            .filter(|invoice| invoice.status != InvoiceStatus::Cancelled)
            .try_fold(Decimal::ZERO, |sum, invoice| {
                money::checked_add("Revenue", sum, invoice.total)
            })?;
        Ok(money::round(revenue))
    }

    async fn completed_visits_between(&self, range: &ReportRange) -> Result<Vec<CompletedVisit>> {
        let state = self.state.lock().await;

        let mut completed: Vec<&Appointment> = state
            .appointments
            .values()
            .filter(|a| range.contains(a.date) && a.status == AppointmentStatus::Completed)
            .collect();
        completed.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));

        Ok(completed
            .into_iter()
            .map(|a| CompletedVisit {
                customer_name: a.customer_name.clone(),
                service_name: a.service_name.clone(),
            })
            .collect())
    }
}

fn demo_menu() -> Vec<NewWashService> {
    [
        ("Lavado Básico", "Lavado exterior básico", 8000, 30),
        ("Lavado Completo", "Lavado exterior e interior", 15000, 45),
        ("Lavado Premium", "Lavado completo con detalles", 25000, 60),
        ("Encerado", "Aplicación de cera protectora", 20000, 30),
        ("Detallado Completo", "Servicio completo de detallado", 40000, 90),
    ]
    .into_iter()
    .map(|(name, description, cents, duration)| NewWashService {
        name: name.to_string(),
        description: Some(description.to_string()),
        price: Decimal::new(cents, 2),
        duration,
        active: true,
    })
    .collect()
}

fn demo_catalog() -> Vec<NewInventoryItem> {
    let washes = [
        ("Lavado Básico", "Lavado exterior básico", 8000),
        ("Lavado Completo", "Lavado exterior e interior", 15000),
        ("Lavado Premium", "Lavado completo con detalles", 25000),
        ("Encerado", "Aplicación de cera protectora", 20000),
        ("Detallado Completo", "Servicio completo de detallado", 40000),
    ];
    let supplies = [
        ("Champú para Autos", "Champú concentrado para lavado", 25, 5, 4500, "AutoClean", "Limpieza"),
        ("Cera Automotriz", "Cera protectora premium", 3, 5, 12000, "CarCare Pro", "Protección"),
        ("Toallas de Microfibra", "Toallas de secado premium", 50, 10, 1500, "Textiles HN", "Accesorios"),
        ("Desengrasante", "Desengrasante industrial", 8, 3, 8500, "AutoClean", "Limpieza"),
        ("Llantas", "Limpiador de llantas", 12, 5, 6500, "CarCare Pro", "Limpieza"),
    ];

    let services = washes.into_iter().map(|(name, description, cents)| NewInventoryItem {
        name: name.to_string(),
        description: Some(description.to_string()),
        barcode: None,
        quantity: None,
        min_quantity: None,
        price: Decimal::new(cents, 2),
        supplier: None,
        category: Some("Servicios".to_string()),
        is_service: true,
        active: true,
    });

    let products = supplies.into_iter().map(
        |(name, description, quantity, min_quantity, cents, supplier, category)| NewInventoryItem {
            name: name.to_string(),
            description: Some(description.to_string()),
            barcode: None,
            quantity: Some(quantity),
            min_quantity: Some(min_quantity),
            price: Decimal::new(cents, 2),
            supplier: Some(supplier.to_string()),
            category: Some(category.to_string()),
            is_service: false,
            active: true,
        },
    );

    services.chain(products).collect()
}
