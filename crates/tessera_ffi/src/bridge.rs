//! The C-ABI function surface a foreign router drives the engine through.
//!
//! Every function takes a [`RouterContext`] pointer plus primitive
//! arguments: identities as tagged `u64` handles, occupants as opaque
//! `*const Cell`/`*const Net` obtained from the context's enumeration
//! calls, strengths as small integers. The foreign side never interprets
//! the pointers it is handed, and the bridge never mutates binding state
//! except through the arbiter.
//!
//! Null pointers and malformed handles are caller contract violations and
//! fail fast.

use crate::codec::{decode_pip, decode_site, decode_wire, encode_opt_wire, encode_wire, NULL_HANDLE};
use std::ffi::CStr;
use std::os::raw::c_char;
use tessera_arch::Architecture;
use tessera_core::{BindingTable, Cell, Design, Net, PlaceStrength};
use tessera_diag::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// The engine state a foreign router operates on for the duration of one
/// synchronous routing call.
///
/// The fields are private: the only way through this type is the `tsr_*`
/// function set, so foreign code cannot bypass the arbiter.
pub struct RouterContext<'a> {
    arch: &'a dyn Architecture,
    design: &'a Design,
    bindings: &'a mut BindingTable,
    sink: &'a DiagnosticSink,
    verbose: bool,
    debug: bool,
}

impl<'a> RouterContext<'a> {
    /// Creates a context over the given engine state with quiet flags.
    pub fn new(
        arch: &'a dyn Architecture,
        design: &'a Design,
        bindings: &'a mut BindingTable,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            arch,
            design,
            bindings,
            sink,
            verbose: false,
            debug: false,
        }
    }

    /// Sets the verbosity flags exposed to the foreign side.
    pub fn with_flags(mut self, verbose: bool, debug: bool) -> Self {
        self.verbose = verbose;
        self.debug = debug;
        self
    }
}

fn strength_from_raw(strength: u8) -> PlaceStrength {
    PlaceStrength::try_from(strength)
        .unwrap_or_else(|value| panic!("invalid strength value {value} crossed the foreign boundary"))
}

/// Returns the distinguished null handle.
#[no_mangle]
pub extern "C" fn tsr_handle_null() -> u64 {
    NULL_HANDLE
}

/// Returns the device grid width.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_grid_dim_x(ctx: *const RouterContext) -> i32 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.arch.grid_dims().0
}

/// Returns the device grid height.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_grid_dim_y(ctx: *const RouterContext) -> i32 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.arch.grid_dims().1
}

/// Returns the context's verbose flag.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_verbose(ctx: *const RouterContext) -> bool {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.verbose
}

/// Returns the context's debug flag.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_debug(ctx: *const RouterContext) -> bool {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.debug
}

/// Validates the binding table against the architecture; panics on any
/// inconsistency.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_check(ctx: *const RouterContext) {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.bindings.check(ctx.arch);
}

/// Binds a site to a cell; returns whether the arbiter accepted the
/// request.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `cell` must be a pointer
/// previously produced by [`tsr_ctx_cell`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_bind_site(
    ctx: *mut RouterContext,
    site: u64,
    cell: *const Cell,
    strength: u8,
) -> bool {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    let cell = cell.as_ref().expect("null cell passed to bridge");
    ctx.bindings
        .bind_site(decode_site(site), cell.id, strength_from_raw(strength))
        .is_ok()
}

/// Unbinds a site; a no-op if the site is unbound.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_unbind_site(ctx: *mut RouterContext, site: u64) {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    ctx.bindings.unbind_site(decode_site(site));
}

/// Returns whether a site has no occupant.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_site_available(ctx: *const RouterContext, site: u64) -> bool {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.bindings.site_available(decode_site(site))
}

/// Binds a wire to a net; returns whether the arbiter accepted the
/// request.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must be a pointer
/// previously produced by [`tsr_ctx_net`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_bind_wire(
    ctx: *mut RouterContext,
    wire: u64,
    net: *const Net,
    strength: u8,
) -> bool {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    ctx.bindings
        .bind_wire(decode_wire(wire), net.id, strength_from_raw(strength))
        .is_ok()
}

/// Unbinds a wire; a no-op if the wire is unbound.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_unbind_wire(ctx: *mut RouterContext, wire: u64) {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    ctx.bindings.unbind_wire(decode_wire(wire));
}

/// Returns whether a wire has no occupant.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_wire_available(ctx: *const RouterContext, wire: u64) -> bool {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.bindings.wire_available(decode_wire(wire))
}

/// Binds a pip to a net; returns whether the arbiter accepted the
/// request.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must be a pointer
/// previously produced by [`tsr_ctx_net`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_bind_pip(
    ctx: *mut RouterContext,
    pip: u64,
    net: *const Net,
    strength: u8,
) -> bool {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    ctx.bindings
        .bind_pip(decode_pip(pip), net.id, strength_from_raw(strength))
        .is_ok()
}

/// Unbinds a pip; a no-op if the pip is unbound.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_unbind_pip(ctx: *mut RouterContext, pip: u64) {
    let ctx = ctx.as_mut().expect("null context passed to bridge");
    ctx.bindings.unbind_pip(decode_pip(pip));
}

/// Returns whether a pip has no occupant.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_pip_available(ctx: *const RouterContext, pip: u64) -> bool {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.bindings.pip_available(decode_pip(pip))
}

/// Returns the wire driving the given pip.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_pip_src_wire(ctx: *const RouterContext, pip: u64) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    encode_wire(ctx.arch.pip_src_wire(decode_pip(pip)))
}

/// Returns the wire driven by the given pip.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_pip_dst_wire(ctx: *const RouterContext, pip: u64) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    encode_wire(ctx.arch.pip_dst_wire(decode_pip(pip)))
}

/// Returns the slow-corner delay estimate between two wires, in
/// nanoseconds.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_estimate_delay(
    ctx: *const RouterContext,
    src: u64,
    dst: u64,
) -> f32 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.arch
        .estimate_delay(decode_wire(src), decode_wire(dst))
        .max_ns as f32
}

/// Returns the smallest meaningful delay difference, in nanoseconds.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_delay_epsilon(ctx: *const RouterContext) -> f32 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.arch.delay_epsilon().max_ns as f32
}

/// Returns the number of cells in the design.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_cell_count(ctx: *const RouterContext) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.design.cell_count() as u64
}

/// Returns an opaque reference to the cell at the given index.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; the returned pointer is
/// valid for the context's lifetime and must not be dereferenced by the
/// caller.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_cell(ctx: *const RouterContext, index: u64) -> *const Cell {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    assert!(
        (index as usize) < ctx.design.cell_count(),
        "cell index {index} out of range"
    );
    &ctx.design.cells[index as usize]
}

/// Returns the number of nets in the design.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`].
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net_count(ctx: *const RouterContext) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    ctx.design.net_count() as u64
}

/// Returns an opaque reference to the net at the given index.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; the returned pointer is
/// valid for the context's lifetime and must not be dereferenced by the
/// caller.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net(ctx: *const RouterContext, index: u64) -> *const Net {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    assert!(
        (index as usize) < ctx.design.net_count(),
        "net index {index} out of range"
    );
    &ctx.design.nets[index as usize]
}

/// Returns the wire driven by the net's placed driver, or the null handle
/// if the net has no placed driver.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must come from
/// [`tsr_ctx_net`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net_source_wire(
    ctx: *const RouterContext,
    net: *const Net,
) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    let source = net
        .driver
        .and_then(|pin| ctx.design.cell(ctx.design.pin(pin).cell).placement)
        .map(|site| ctx.arch.site_source_wire(site));
    encode_opt_wire(source)
}

/// Returns the number of sink pins on the net.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must come from
/// [`tsr_ctx_net`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net_sink_count(
    ctx: *const RouterContext,
    net: *const Net,
) -> u64 {
    let _ = ctx.as_ref().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    net.sinks.len() as u64
}

/// Returns the wire feeding the net's sink at the given index, or the
/// null handle if that sink's cell is unplaced.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must come from
/// [`tsr_ctx_net`] on the same context.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net_sink_wire(
    ctx: *const RouterContext,
    net: *const Net,
    index: u64,
) -> u64 {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    assert!(
        (index as usize) < net.sinks.len(),
        "sink index {index} out of range for net {}",
        net.name
    );
    let sink = ctx
        .design
        .cell(ctx.design.pin(net.sinks[index as usize]).cell)
        .placement
        .map(|site| ctx.arch.site_sink_wire(site));
    encode_opt_wire(sink)
}

/// Copies the net's name into `buffer` as a NUL-terminated string,
/// truncating to `capacity - 1` bytes. Returns the full name length.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `net` must come from
/// [`tsr_ctx_net`]; `buffer` must point to at least `capacity` writable
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn tsr_ctx_net_name(
    ctx: *const RouterContext,
    net: *const Net,
    buffer: *mut c_char,
    capacity: usize,
) -> usize {
    let _ = ctx.as_ref().expect("null context passed to bridge");
    let net = net.as_ref().expect("null net passed to bridge");
    assert!(!buffer.is_null(), "null buffer passed to bridge");
    let bytes = net.name.as_bytes();
    if capacity > 0 {
        let copy = bytes.len().min(capacity - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, copy);
        *buffer.add(copy) = 0;
    }
    bytes.len()
}

/// Emits an informational message into the engine's diagnostic sink.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `message` must be a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tsr_log_info(ctx: *const RouterContext, message: *const c_char) {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    assert!(!message.is_null(), "null message passed to bridge");
    let message = CStr::from_ptr(message).to_string_lossy().into_owned();
    ctx.sink
        .emit(Diagnostic::note(DiagnosticCode::new(Category::Route, 90), message));
}

/// Emits a warning into the engine's diagnostic sink.
///
/// # Safety
///
/// `ctx` must point to a live [`RouterContext`]; `message` must be a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tsr_log_warning(ctx: *const RouterContext, message: *const c_char) {
    let ctx = ctx.as_ref().expect("null context passed to bridge");
    assert!(!message.is_null(), "null message passed to bridge");
    let message = CStr::from_ptr(message).to_string_lossy().into_owned();
    ctx.sink
        .emit(Diagnostic::warning(DiagnosticCode::new(Category::Route, 91), message));
}
