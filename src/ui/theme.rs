//! Shared class strings so pages stay visually consistent.

use crate::domain::{AlertKind, FieldMark};
use crate::ui::components::toast::ToastKind;

// ============================================
// BUTTONS
// ============================================

pub fn btn_primary() -> &'static str {
    "inline-flex items-center gap-2 rounded-lg bg-emerald-600 px-4 py-2 text-sm font-semibold text-white hover:bg-emerald-500 disabled:cursor-not-allowed disabled:opacity-60"
}

pub fn btn_secondary() -> &'static str {
    "rounded-lg border border-slate-600 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-slate-200 hover:bg-slate-800"
}

pub fn btn_danger() -> &'static str {
    "rounded-lg border border-rose-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-rose-200 hover:bg-rose-500/10"
}

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "min-w-[6rem] rounded-lg border border-emerald-500/60 bg-emerald-500/15 px-4 py-2 font-semibold text-emerald-300"
    } else {
        "min-w-[6rem] rounded-lg border border-transparent px-4 py-2 text-slate-400 transition hover:border-slate-700 hover:bg-slate-900/80 hover:text-slate-200"
    }
}

// ============================================
// FORMS
// ============================================

pub fn label_class() -> &'static str {
    "block text-xs font-semibold uppercase tracking-wide text-slate-500"
}

pub fn input_class(mark: FieldMark) -> &'static str {
    match mark {
        FieldMark::Untouched => "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-emerald-500 focus:outline-none",
        FieldMark::Valid => "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:outline-none field-valid",
        FieldMark::Invalid => "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:outline-none field-invalid",
    }
}

// ============================================
// PANELS / FEEDBACK
// ============================================

pub fn panel() -> &'static str {
    "rounded-xl border border-slate-800 bg-slate-900/40 p-6"
}

pub fn section_title() -> &'static str {
    "text-sm font-semibold uppercase tracking-wide text-slate-500"
}

/// Theme classes and icon for a toast.
pub fn toast(kind: ToastKind) -> (&'static str, &'static str) {
    match kind {
        ToastKind::Success => (
            "border-emerald-500/40 bg-emerald-600 text-white",
            "✅",
        ),
        ToastKind::Error => ("border-rose-500/40 bg-rose-600 text-white", "⛔"),
        ToastKind::Info => ("border-sky-500/40 bg-sky-600 text-white", "ℹ️"),
        ToastKind::Warning => ("border-amber-500/40 bg-amber-500 text-slate-900", "⚠️"),
    }
}

pub fn alert(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Success => "border-emerald-500/40 bg-emerald-500/10 text-emerald-100",
        AlertKind::Info => "border-sky-500/40 bg-sky-500/10 text-sky-100",
        AlertKind::Warning => "border-amber-500/40 bg-amber-500/10 text-amber-100",
        AlertKind::Danger => "border-rose-500/40 bg-rose-500/10 text-rose-100",
    }
}
