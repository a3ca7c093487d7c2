mod invoice;
mod invoice_item;
mod invoice_number;

pub use invoice::{
    parse_business_date, CreateInvoiceItemRequest, CreateInvoiceRequest, CustomerRequest,
    Invoice, InvoiceDraft, InvoiceStatus, InvoiceTotals, InvoiceWithItems,
    UpdateInvoiceStatusRequest,
};
pub use invoice_item::{InvoiceItem, InvoiceItemDraft};
pub use invoice_number::{InvoiceNumber, DEFAULT_INVOICE_PREFIX};
