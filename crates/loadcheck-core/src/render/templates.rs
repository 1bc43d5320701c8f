//! Probe source, CMake and Python templates.
//!
//! Placeholders use the `@NAME@` form understood by CMake's
//! `configure_file`, so templates stay readable next to C/C++ braces.

/// Printed when the library cannot be opened.
pub const OPEN_FAILURE_MARKER: &str = "Cannot open library";

/// Printed by the POSIX delayed probe when `dlsym` fails.
pub const SYMBOL_FAILURE_MARKER: &str = "Cannot load symbol";

/// Printed by the Windows delayed probe when `GetProcAddress` fails.
pub const FUNCTION_FAILURE_MARKER: &str = "Cannot get function";

pub(super) const STATIC_LINK_SOURCE: &str = r#"#include <stdio.h>

void @ENTRY_SYMBOL@(void);

int main(void) {
    printf("Calling @ENTRY_SYMBOL@...\n");
    @ENTRY_SYMBOL@();
    printf("Hello, world!\n");
    return 0;
}
"#;

pub(super) const DELAYED_LOAD_SOURCE_POSIX: &str = r#"#include <iostream>
#include <dlfcn.h>

int main() {
    std::cout << "Opening shared library...\n";
    void* handle = dlopen("@LIBRARY_PATH@", RTLD_LAZY);
    if (!handle) {
        const char* open_error = dlerror();
        std::cerr << "Cannot open library: " << (open_error ? open_error : "@LIBRARY_PATH@") << "\n";
        return 1;
    }
    dlerror();
    std::cout << "Loading symbol @ENTRY_SYMBOL@...\n";
    typedef void (*entry_t)();
    entry_t entry = (entry_t) dlsym(handle, "@ENTRY_SYMBOL@");
    const char* dlsym_error = dlerror();
    if (dlsym_error) {
        std::cerr << "Cannot load symbol '@ENTRY_SYMBOL@': " << dlsym_error << "\n";
        dlclose(handle);
        return 1;
    }
    std::cout << "Calling @ENTRY_SYMBOL@...\n";
    entry();
    std::cout << "Closing library...\n";
    dlclose(handle);
    return 0;
}
"#;

pub(super) const DELAYED_LOAD_SOURCE_WINDOWS: &str = r#"#include <windows.h>
#include <iostream>

int main() {
    std::cout << "Opening shared library...\n";
    HINSTANCE hInst = LoadLibraryA("@LIBRARY_PATH@");
    if (!hInst) {
        std::cerr << "Cannot open library: @LIBRARY_PATH@ (error " << GetLastError() << ")\n";
        return 1;
    }
    typedef void (*ENTRYFUNCTYPE)();
    ENTRYFUNCTYPE entry = (ENTRYFUNCTYPE)GetProcAddress(hInst, "@ENTRY_SYMBOL@");
    if (!entry) {
        std::cerr << "Cannot get function @ENTRY_SYMBOL@\n";
        FreeLibrary(hInst);
        return 1;
    }
    std::cout << "Calling @ENTRY_SYMBOL@...\n";
    entry();
    std::cout << "Closing library...\n";
    FreeLibrary(hInst);
    return 0;
}
"#;

pub(super) const STATIC_LINK_CMAKELISTS: &str = r#"cmake_minimum_required(VERSION 3.10)
project(@TARGET_NAME@ C)
include_directories("@INSTALL_DIR@/include")
add_executable(@TARGET_NAME@ @SOURCE_FILE@)
set(DLL_PATH "@LINK_LIBRARY@")
target_link_libraries(@TARGET_NAME@ ${DLL_PATH})
"#;

pub(super) const MACOS_FIXUP_HOOK: &str = r#"add_custom_command(
    TARGET @TARGET_NAME@ POST_BUILD
    COMMAND
        ${CMAKE_COMMAND}
        -DDLL_PATH=${DLL_PATH} -DTARGET_PATH=$<TARGET_FILE:@TARGET_NAME@>
        -P "${CMAKE_SOURCE_DIR}/fixup.cmake"
    DEPENDS "${CMAKE_SOURCE_DIR}/fixup.cmake"
)
"#;

pub(super) const MACOS_FIXUP_SCRIPT: &str = r#"include(GetPrerequisites)
get_prerequisites(${TARGET_PATH} PR 0 0 "" "")
foreach(P IN LISTS PR)
    string(FIND ${P} "@LIBRARY_STEM@" LIBFOUND)
    if (NOT LIBFOUND EQUAL -1)
        execute_process(COMMAND install_name_tool -change ${P} "${DLL_PATH}" ${TARGET_PATH})
    endif()
endforeach()
"#;

pub(super) const DELAYED_LOAD_CMAKELISTS: &str = r#"cmake_minimum_required(VERSION 3.10)
project(@TARGET_NAME@ CXX)
add_executable(@TARGET_NAME@ @SOURCE_FILE@)
target_link_libraries(@TARGET_NAME@ ${CMAKE_DL_LIBS})
"#;

pub(super) const PYTHON_CTYPES_SCRIPT: &str = r#"import ctypes
import sys

print("Opening shared library...")
try:
    library = ctypes.CDLL("@LIBRARY_PATH@")
except OSError as error:
    print("Cannot open library: %s" % error, file=sys.stderr)
    sys.exit(1)
print("Loading symbol @ENTRY_SYMBOL@...")
try:
    entry = getattr(library, "@ENTRY_SYMBOL@")
except AttributeError as error:
    print("Cannot load symbol '@ENTRY_SYMBOL@': %s" % error, file=sys.stderr)
    sys.exit(1)
print("Calling @ENTRY_SYMBOL@...")
entry()
print("Hello, world!")
"#;

pub(super) const PYTHON_ENERGYPLUS_SCRIPT: &str = r#"import sys

sys.path.insert(0, "@INSTALL_DIR@")
try:
    from @PYTHON_MODULE@ import EnergyPlusAPI
    api = EnergyPlusAPI()
except (ImportError, OSError) as error:
    print("Cannot open library: %s" % error, file=sys.stderr)
    sys.exit(1)
glycol = api.functional.glycol(u"water")
for temperature in [5.0, 15.0, 25.0]:
    cp = glycol.specific_heat(temperature)
    rho = glycol.density(temperature)
    print("T = %5.1f  Cp = %8.3f  rho = %8.3f" % (temperature, cp, rho))
print("Hello, world!")
"#;

/// Substitute every `@KEY@` placeholder.
pub(super) fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("@{key}@"), value)
        })
}
