#[cfg(target_os = "macos")]
pub mod macos {
    use core_foundation::base::TCFType;
    use core_foundation::boolean::CFBoolean;
    use core_foundation::dictionary::CFDictionary;
    use core_foundation::string::CFString;
    use std::ffi::CStr;
    use std::process::Command;

    const LOG_TAG_PERMISSIONS: &str = "[PERMISSIONS]";
    const CORE_GRAPHICS: &CStr = c"/System/Library/Frameworks/CoreGraphics.framework/CoreGraphics";
    const APPLICATION_SERVICES: &CStr =
        c"/System/Library/Frameworks/ApplicationServices.framework/ApplicationServices";

    /// Resolves `symbol` from `framework` and hands it to `call`. Returns `fallback` when
    /// the framework or symbol is missing.
    unsafe fn with_framework_symbol<R>(
        framework: &CStr,
        symbol: &CStr,
        fallback: R,
        call: impl FnOnce(*mut libc::c_void) -> R,
    ) -> R {
        let library = libc::dlopen(framework.as_ptr(), libc::RTLD_LAZY);
        if library.is_null() {
            log::warn!(
                "{} Could not load framework {:?}",
                LOG_TAG_PERMISSIONS,
                framework
            );
            return fallback;
        }

        let symbol_pointer = libc::dlsym(library, symbol.as_ptr());
        let result = if symbol_pointer.is_null() {
            log::warn!("{} Could not find {:?}", LOG_TAG_PERMISSIONS, symbol);
            fallback
        } else {
            call(symbol_pointer)
        };

        libc::dlclose(library);
        result
    }

    pub fn has_screen_recording_permission() -> bool {
        type PreflightFn = unsafe extern "C" fn() -> bool;

        unsafe {
            with_framework_symbol(
                CORE_GRAPHICS,
                c"CGPreflightScreenCaptureAccess",
                true,
                |pointer| {
                    let preflight: PreflightFn = std::mem::transmute(pointer);
                    preflight()
                },
            )
        }
    }

    /// Checks screen recording access and triggers the system prompt when it is missing.
    pub fn request_screen_recording_permission() -> bool {
        if has_screen_recording_permission() {
            log::info!("{} Screen recording permission granted", LOG_TAG_PERMISSIONS);
            return true;
        }

        type RequestFn = unsafe extern "C" fn() -> bool;

        log::warn!(
            "{} Screen recording permission missing, requesting it",
            LOG_TAG_PERMISSIONS
        );
        let granted = unsafe {
            with_framework_symbol(
                CORE_GRAPHICS,
                c"CGRequestScreenCaptureAccess",
                false,
                |pointer| {
                    let request: RequestFn = std::mem::transmute(pointer);
                    request()
                },
            )
        };

        if !granted {
            open_privacy_pane("Privacy_ScreenCapture");
        }
        granted
    }

    /// Global hotkeys need accessibility access. Prompts once when it is missing.
    pub fn request_accessibility_permission() -> bool {
        type TrustedWithOptionsFn = unsafe extern "C" fn(*const libc::c_void) -> bool;

        let key = CFString::from_static_string("AXTrustedCheckOptionPrompt");
        let value = CFBoolean::true_value();
        let options = CFDictionary::from_CFType_pairs(&[(key, value.as_CFType())]);

        let trusted = unsafe {
            with_framework_symbol(
                APPLICATION_SERVICES,
                c"AXIsProcessTrustedWithOptions",
                true,
                |pointer| {
                    let is_trusted: TrustedWithOptionsFn = std::mem::transmute(pointer);
                    is_trusted(options.as_concrete_TypeRef() as *const libc::c_void)
                },
            )
        };

        if trusted {
            log::info!("{} Accessibility permission granted", LOG_TAG_PERMISSIONS);
        } else {
            log::warn!(
                "{} Accessibility permission missing, global hotkeys will not work",
                LOG_TAG_PERMISSIONS
            );
        }
        trusted
    }

    fn open_privacy_pane(anchor: &str) {
        let pane = format!(
            "x-apple.systempreferences:com.apple.preference.security?{}",
            anchor
        );

        match Command::new("open").arg(&pane).status() {
            Ok(status) if status.success() => {
                log::info!("{} Opened system settings at {}", LOG_TAG_PERMISSIONS, anchor);
            }
            Ok(status) => {
                log::error!(
                    "{} Failed to open system settings: exit code {:?}",
                    LOG_TAG_PERMISSIONS,
                    status.code()
                );
            }
            Err(error) => {
                log::error!(
                    "{} Failed to execute open command: {}",
                    LOG_TAG_PERMISSIONS,
                    error
                );
            }
        }
    }
}

#[cfg(not(target_os = "macos"))]
pub mod macos {
    pub fn request_screen_recording_permission() -> bool {
        true
    }

    pub fn request_accessibility_permission() -> bool {
        true
    }
}
