//! Shared regex patterns for the shipped document layouts.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Weighing ticket, pt-BR labeled template (layout-1)
    pub static ref TICKET_NUMBER: Regex = Regex::new(
        r"(?i)ticket\s*:?\s*([A-Za-z0-9][A-Za-z0-9/\-]*)"
    ).unwrap();

    pub static ref PLATE: Regex = Regex::new(
        r"(?i)placa\s*:?\s*([A-Z]{3}[- ]?\d[A-Z0-9]\d{2})"
    ).unwrap();

    pub static ref PRODUCT: Regex = Regex::new(
        r"(?i)produto\s*:?\s*(.+)"
    ).unwrap();

    pub static ref SUPPLIER: Regex = Regex::new(
        r"(?i)fornecedor\s*:?\s*(.+)"
    ).unwrap();

    pub static ref GROSS_WEIGHT: Regex = Regex::new(
        r"(?i)peso\s+bruto\s*:?\s*([\d.,]+)\s*(kg|t|ton)\b"
    ).unwrap();

    pub static ref TARE_WEIGHT: Regex = Regex::new(
        r"(?i)tara\s*:?\s*([\d.,]+)\s*(kg|t|ton)\b"
    ).unwrap();

    pub static ref NET_WEIGHT: Regex = Regex::new(
        r"(?i)peso\s+l[ií]quido\s*:?\s*([\d.,]+)\s*(kg|t|ton)\b"
    ).unwrap();

    // Generic date/time label shared by all weighings on layout-1. Both
    // weight fields search for this same pattern after their own anchor.
    pub static ref DATE_TIME_LABEL: Regex = Regex::new(
        r"(?i)data\s*/\s*hora\s*:?\s*(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}(?::\d{2})?)"
    ).unwrap();

    // Weighing ticket, uppercase scale-house template (layout-2)
    pub static ref ENTRY_WEIGHT: Regex = Regex::new(
        r"(?i)peso\s+entrada\s*:?\s*([\d.,]+)\s*(kg|t|ton)\b"
    ).unwrap();

    pub static ref EXIT_WEIGHT: Regex = Regex::new(
        r"(?i)peso\s+sa[ií]da\s*:?\s*([\d.,]+)\s*(kg|t|ton)\b"
    ).unwrap();

    pub static ref SCALE_ID: Regex = Regex::new(
        r"(?i)balan[çc]a\s*:?\s*([A-Za-z0-9\-]+)"
    ).unwrap();

    // Unlabeled ticket number candidate: a standalone 5-8 digit run.
    pub static ref BARE_TICKET_NUMBER: Regex = Regex::new(
        r"\b(\d{5,8})\b"
    ).unwrap();

    // Transport manifest (layout-1)
    pub static ref MANIFEST_NUMBER: Regex = Regex::new(
        r"(?i)\bMTR\s*(?:n[º°o]\.?)?\s*:?\s*(\d+)"
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)data\s+de\s+emiss[ãa]o\s*:?\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref TRANSPORTER: Regex = Regex::new(
        r"(?i)transportador\s*:?\s*(.+)"
    ).unwrap();

    // Manifest table headers. Multiline: matched both against single
    // block texts and against the newline-joined raw text when scoring.
    pub static ref HEADER_DESCRIPTION: Regex = Regex::new(
        r"(?im)^\s*descri[çc][ãa]o"
    ).unwrap();

    pub static ref HEADER_QUANTITY: Regex = Regex::new(
        r"(?im)^\s*quantidade"
    ).unwrap();

    pub static ref HEADER_UNIT: Regex = Regex::new(
        r"(?im)^\s*unidade"
    ).unwrap();
}
