//! C foreign-function surface (§10.5): `extern "C"` entry points for
//! lowering a JSON string to a packed buffer, validating a buffer, and
//! reading it through a zero-copy cursor, for callers outside Rust.
//!
//! The binding contract mirrors the original library's ABI shim: every
//! entry point returns a small stable error code rather than unwinding
//! across the FFI boundary, and the human-readable message for the last
//! error on the calling thread is fetched separately through
//! [`polypack_last_error`] — a `thread_local`, exactly as that original
//! shim's own `errmsg` global worked, just scoped per-thread here instead
//! of process-wide.
//!
//! A cursor here is not an opaque handle; it's the `(bytes, len, offset)`
//! triple a caller already holds, rebuilt into a real [`Cursor`] for the
//! duration of a single call. That keeps the surface free of any cursor
//! lifetime or destructor the C side would have to manage.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::slice;

use polypack::buffer::Cursor;
use polypack::{Buffer, Error, Kind};

pub const POLYPACK_OK: i32 = 0;
pub const POLYPACK_ERR_KIND_MISMATCH: i32 = 1;
pub const POLYPACK_ERR_OUT_OF_RANGE: i32 = 2;
pub const POLYPACK_ERR_STRUCTURAL: i32 = 3;
pub const POLYPACK_ERR_VALIDATION: i32 = 4;
pub const POLYPACK_ERR_PARSE: i32 = 5;
pub const POLYPACK_ERR_NULL_POINTER: i32 = 6;
pub const POLYPACK_ERR_UTF8: i32 = 7;
pub const POLYPACK_ERR_STATE: i32 = 8;
pub const POLYPACK_ERR_UNKNOWN: i32 = -1;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(message: impl Into<std::string::String>) {
    let message = message.into();
    let c_message = CString::new(message).unwrap_or_else(|_| {
        CString::new("polypack error message contained an interior NUL byte").unwrap()
    });
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(c_message));
}

fn code_for(err: &Error) -> i32 {
    match err {
        Error::KindMismatch { .. } => POLYPACK_ERR_KIND_MISMATCH,
        Error::OutOfRange => POLYPACK_ERR_OUT_OF_RANGE,
        Error::Structural(_) => POLYPACK_ERR_STRUCTURAL,
        Error::Validation(_) => POLYPACK_ERR_VALIDATION,
        Error::Parse(_) => POLYPACK_ERR_PARSE,
        Error::State(_) => POLYPACK_ERR_STATE,
    }
}

fn fail(err: Error) -> i32 {
    let code = code_for(&err);
    set_last_error(err.to_string());
    code
}

/// Returns the message for the last error raised on the calling thread, or
/// a null pointer if none has been raised yet. The returned pointer is
/// valid until the next call into this library from the same thread.
#[no_mangle]
pub extern "C" fn polypack_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| match slot.borrow().as_ref() {
        Some(message) => message.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Parses a UTF-8 JSON document and lowers it directly to a packed buffer.
/// On success, `*out_ptr`/`*out_len` describe a heap allocation the caller
/// must release via [`polypack_free_buffer`]. On failure, returns a
/// nonzero error code and leaves `*out_ptr`/`*out_len` untouched.
#[no_mangle]
pub unsafe extern "C" fn polypack_lower_json(
    json_ptr: *const u8,
    json_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    if json_ptr.is_null() || out_ptr.is_null() || out_len.is_null() {
        set_last_error("null pointer passed to polypack_lower_json");
        return POLYPACK_ERR_NULL_POINTER;
    }
    let bytes = slice::from_raw_parts(json_ptr, json_len);
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            set_last_error(e.to_string());
            return POLYPACK_ERR_UTF8;
        }
    };
    let tree = match polypack::json::from_str(text) {
        Ok(tree) => tree,
        Err(e) => return fail(e),
    };
    let buffer: Buffer<polypack::Rc> = match Buffer::from_heap(&tree) {
        Ok(buffer) => buffer,
        Err(e) => return fail(e),
    };

    let mut owned = buffer.as_bytes().to_vec().into_boxed_slice();
    *out_len = owned.len();
    *out_ptr = owned.as_mut_ptr();
    std::mem::forget(owned);
    POLYPACK_OK
}

/// Releases a buffer previously returned by [`polypack_lower_json`].
#[no_mangle]
pub unsafe extern "C" fn polypack_free_buffer(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    drop(std::vec::Vec::from_raw_parts(ptr, len, len));
}

/// Validates a byte slice as a standalone packed value (§4.4), without
/// taking ownership of it. Returns `POLYPACK_OK` if `bytes` is exactly one
/// valid packed value with no trailing bytes.
#[no_mangle]
pub unsafe extern "C" fn polypack_validate(bytes_ptr: *const u8, bytes_len: usize) -> i32 {
    if bytes_ptr.is_null() {
        set_last_error("null pointer passed to polypack_validate");
        return POLYPACK_ERR_NULL_POINTER;
    }
    let bytes = slice::from_raw_parts(bytes_ptr, bytes_len);
    match polypack::buffer::validate_exact(bytes) {
        Ok(()) => POLYPACK_OK,
        Err(e) => fail(e),
    }
}

unsafe fn cursor_at<'a>(bytes_ptr: *const u8, bytes_len: usize, offset: usize) -> Result<Cursor<'a>, Error> {
    let bytes = slice::from_raw_parts(bytes_ptr, bytes_len);
    Cursor::at_offset(bytes, offset)
}

/// Writes the [`Kind`] discriminant (as a small int, matching
/// `Kind`'s own `#[repr]` values) of the node at `offset` into `*out_kind`.
#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_kind(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_kind: *mut i32,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.kind() {
        Ok(kind) => {
            *out_kind = kind as i32;
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

/// Writes the child count of an object/array at `offset` into `*out_len`,
/// or `-1` for a scalar node.
#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_len(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_len: *mut i64,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.len() {
        Ok(len) => {
            *out_len = len.map(|n| n as i64).unwrap_or(-1);
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_as_integer(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_value: *mut i64,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.as_integer() {
        Ok(v) => {
            *out_value = v;
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_as_decimal(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_value: *mut f64,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.as_decimal() {
        Ok(v) => {
            *out_value = v.as_f64();
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_as_boolean(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_value: *mut u8,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.as_boolean() {
        Ok(v) => {
            *out_value = v as u8;
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_is_null(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_value: *mut u8,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.is_null() {
        Ok(v) => {
            *out_value = v as u8;
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

/// Writes a pointer to the string's UTF-8 bytes (borrowed from `bytes_ptr`,
/// valid exactly as long as the caller keeps that buffer alive) and its
/// length into `*out_ptr`/`*out_len`. No allocation.
#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_as_str(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    out_ptr: *mut *const u8,
    out_len: *mut usize,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.as_str() {
        Ok(s) => {
            *out_ptr = s.as_ptr();
            *out_len = s.len();
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

/// Keyed lookup on an object node. Writes the child's offset into
/// `*out_offset` and `1` into `*out_found` on a hit; `0` into `*out_found`
/// (and leaves `*out_offset` untouched) on a clean miss.
#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_get(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    key_ptr: *const u8,
    key_len: usize,
    out_offset: *mut usize,
    out_found: *mut u8,
) -> i32 {
    if key_ptr.is_null() {
        set_last_error("null key pointer passed to polypack_cursor_get");
        return POLYPACK_ERR_NULL_POINTER;
    }
    let key_bytes = slice::from_raw_parts(key_ptr, key_len);
    let key = match std::str::from_utf8(key_bytes) {
        Ok(key) => key,
        Err(e) => {
            set_last_error(e.to_string());
            return POLYPACK_ERR_UTF8;
        }
    };
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.get(key) {
        Ok(Some(child)) => {
            *out_offset = child.offset();
            *out_found = 1;
            POLYPACK_OK
        }
        Ok(None) => {
            *out_found = 0;
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

/// Indexed lookup on an array node. Writes the child's offset into
/// `*out_offset`.
#[no_mangle]
pub unsafe extern "C" fn polypack_cursor_get_index(
    bytes_ptr: *const u8,
    bytes_len: usize,
    offset: usize,
    index: usize,
    out_offset: *mut usize,
) -> i32 {
    let cursor = match cursor_at(bytes_ptr, bytes_len, offset) {
        Ok(cursor) => cursor,
        Err(e) => return fail(e),
    };
    match cursor.get_index(index) {
        Ok(child) => {
            *out_offset = child.offset();
            POLYPACK_OK
        }
        Err(e) => fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_validates_and_reads_back_through_the_c_surface() {
        let json = br#"{"a":1,"b":"hi"}"#;
        let mut ptr = std::ptr::null_mut();
        let mut len = 0usize;
        unsafe {
            let rc = polypack_lower_json(json.as_ptr(), json.len(), &mut ptr, &mut len);
            assert_eq!(rc, POLYPACK_OK);

            assert_eq!(polypack_validate(ptr, len), POLYPACK_OK);

            let mut kind = 0i32;
            assert_eq!(polypack_cursor_kind(ptr, len, 0, &mut kind), POLYPACK_OK);
            assert_eq!(kind, Kind::Object as i32);

            let key = b"a";
            let mut child_offset = 0usize;
            let mut found = 0u8;
            let rc = polypack_cursor_get(
                ptr,
                len,
                0,
                key.as_ptr(),
                key.len(),
                &mut child_offset,
                &mut found,
            );
            assert_eq!(rc, POLYPACK_OK);
            assert_eq!(found, 1);

            let mut value = 0i64;
            assert_eq!(
                polypack_cursor_as_integer(ptr, len, child_offset, &mut value),
                POLYPACK_OK
            );
            assert_eq!(value, 1);

            polypack_free_buffer(ptr, len);
        }
    }

    #[test]
    fn reports_a_message_through_last_error_on_failure() {
        let bad = b"{not json";
        let mut ptr = std::ptr::null_mut();
        let mut len = 0usize;
        unsafe {
            let rc = polypack_lower_json(bad.as_ptr(), bad.len(), &mut ptr, &mut len);
            assert_eq!(rc, POLYPACK_ERR_PARSE);
            assert!(!polypack_last_error().is_null());
        }
    }
}

