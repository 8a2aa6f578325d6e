//! Built-in provider tables: standard library and platform headers.
//!
//! Each entry reads "symbols in `from` are available by including `to`".
//! A private `from` must never be suggested; a public `from` simply has an
//! alternative public provider.

use super::Visibility::{self, Private, Public};

/// One built-in mapping row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinEntry {
    pub from: &'static str,
    pub from_visibility: Visibility,
    pub to: &'static str,
    pub to_visibility: Visibility,
}

const fn entry(
    from: &'static str,
    from_visibility: Visibility,
    to: &'static str,
    to_visibility: Visibility,
) -> BuiltinEntry {
    BuiltinEntry {
        from,
        from_visibility,
        to,
        to_visibility,
    }
}

/// Public C++ standard headers. Always public, whatever a mapping says.
pub const STDLIB_CPP_PUBLIC_HEADERS: &[&str] = &[
    "<algorithm>",
    "<array>",
    "<atomic>",
    "<bitset>",
    "<chrono>",
    "<codecvt>",
    "<complex>",
    "<condition_variable>",
    "<deque>",
    "<exception>",
    "<forward_list>",
    "<fstream>",
    "<functional>",
    "<future>",
    "<initializer_list>",
    "<iomanip>",
    "<ios>",
    "<iosfwd>",
    "<iostream>",
    "<istream>",
    "<iterator>",
    "<limits>",
    "<list>",
    "<locale>",
    "<map>",
    "<memory>",
    "<mutex>",
    "<new>",
    "<numeric>",
    "<ostream>",
    "<queue>",
    "<random>",
    "<ratio>",
    "<regex>",
    "<scoped_allocator>",
    "<set>",
    "<sstream>",
    "<stack>",
    "<stdexcept>",
    "<streambuf>",
    "<string>",
    "<strstream>",
    "<system_error>",
    "<thread>",
    "<tuple>",
    "<type_traits>",
    "<typeindex>",
    "<typeinfo>",
    "<unordered_map>",
    "<unordered_set>",
    "<utility>",
    "<valarray>",
    "<vector>",
];

/// libstdc++ implementation headers.
pub const LIBSTDCPP_INCLUDE_MAP: &[BuiltinEntry] = &[
    entry("<bits/stl_algo.h>", Private, "<algorithm>", Public),
    entry("<bits/stl_algobase.h>", Private, "<algorithm>", Public),
    entry("<bits/stl_heap.h>", Private, "<algorithm>", Public),
    entry("<bits/stl_vector.h>", Private, "<vector>", Public),
    entry("<bits/stl_bvector.h>", Private, "<vector>", Public),
    entry("<bits/vector.tcc>", Private, "<vector>", Public),
    entry("<bits/stl_list.h>", Private, "<list>", Public),
    entry("<bits/list.tcc>", Private, "<list>", Public),
    entry("<bits/stl_deque.h>", Private, "<deque>", Public),
    entry("<bits/stl_map.h>", Private, "<map>", Public),
    entry("<bits/stl_multimap.h>", Private, "<map>", Public),
    entry("<bits/stl_set.h>", Private, "<set>", Public),
    entry("<bits/stl_multiset.h>", Private, "<set>", Public),
    entry("<bits/stl_tree.h>", Private, "<map>", Public),
    entry("<bits/stl_tree.h>", Private, "<set>", Public),
    entry("<bits/stl_queue.h>", Private, "<queue>", Public),
    entry("<bits/stl_stack.h>", Private, "<stack>", Public),
    entry("<bits/stl_pair.h>", Private, "<utility>", Public),
    entry("<bits/move.h>", Private, "<utility>", Public),
    entry("<bits/stl_function.h>", Private, "<functional>", Public),
    entry("<bits/std_function.h>", Private, "<functional>", Public),
    entry("<bits/stl_numeric.h>", Private, "<numeric>", Public),
    entry("<bits/stl_iterator.h>", Private, "<iterator>", Public),
    entry("<bits/stl_iterator_base_types.h>", Private, "<iterator>", Public),
    entry("<bits/stl_iterator_base_funcs.h>", Private, "<iterator>", Public),
    entry("<bits/basic_string.h>", Private, "<string>", Public),
    entry("<bits/basic_string.tcc>", Private, "<string>", Public),
    entry("<bits/char_traits.h>", Private, "<string>", Public),
    entry("<bits/stringfwd.h>", Private, "<string>", Public),
    entry("<bits/stringfwd.h>", Private, "<iosfwd>", Public),
    entry("<bits/unique_ptr.h>", Private, "<memory>", Public),
    entry("<bits/shared_ptr.h>", Private, "<memory>", Public),
    entry("<bits/shared_ptr_base.h>", Private, "<memory>", Public),
    entry("<bits/allocator.h>", Private, "<memory>", Public),
    entry("<bits/stl_construct.h>", Private, "<memory>", Public),
    entry("<bits/stl_uninitialized.h>", Private, "<memory>", Public),
    entry("<bits/unordered_map.h>", Private, "<unordered_map>", Public),
    entry("<bits/unordered_set.h>", Private, "<unordered_set>", Public),
    entry("<bits/hashtable.h>", Private, "<unordered_map>", Public),
    entry("<bits/hashtable.h>", Private, "<unordered_set>", Public),
    entry("<bits/functional_hash.h>", Private, "<functional>", Public),
    entry("<bits/ios_base.h>", Private, "<ios>", Public),
    entry("<bits/basic_ios.h>", Private, "<ios>", Public),
    entry("<bits/ostream.tcc>", Private, "<ostream>", Public),
    entry("<bits/istream.tcc>", Private, "<istream>", Public),
    entry("<bits/sstream.tcc>", Private, "<sstream>", Public),
    entry("<bits/fstream.tcc>", Private, "<fstream>", Public),
    entry("<bits/locale_facets.h>", Private, "<locale>", Public),
    entry("<bits/exception.h>", Private, "<exception>", Public),
    entry("<bits/exception_ptr.h>", Private, "<exception>", Public),
    entry("<bits/functexcept.h>", Private, "<stdexcept>", Public),
    entry("<bits/std_mutex.h>", Private, "<mutex>", Public),
    entry("<bits/unique_lock.h>", Private, "<mutex>", Public),
    entry("<bits/std_thread.h>", Private, "<thread>", Public),
    entry("<bits/chrono.h>", Private, "<chrono>", Public),
    entry("<bits/atomic_base.h>", Private, "<atomic>", Public),
    entry("<bits/random.h>", Private, "<random>", Public),
    entry("<bits/regex.h>", Private, "<regex>", Public),
    entry("<bits/c++config.h>", Private, "<cstddef>", Public),
    entry("<ext/new_allocator.h>", Private, "<memory>", Public),
    entry("<ext/alloc_traits.h>", Private, "<memory>", Public),
    entry("<ext/type_traits.h>", Private, "<type_traits>", Public),
    // Public headers that re-export others.
    entry("<ios>", Public, "<istream>", Public),
    entry("<ios>", Public, "<ostream>", Public),
    entry("<istream>", Public, "<iostream>", Public),
    entry("<istream>", Public, "<fstream>", Public),
    entry("<istream>", Public, "<sstream>", Public),
    entry("<ostream>", Public, "<iostream>", Public),
    entry("<ostream>", Public, "<fstream>", Public),
    entry("<ostream>", Public, "<sstream>", Public),
];

/// glibc implementation headers.
pub const LIBC_INCLUDE_MAP: &[BuiltinEntry] = &[
    entry("<bits/types.h>", Private, "<sys/types.h>", Public),
    entry("<bits/typesizes.h>", Private, "<sys/types.h>", Public),
    entry("<bits/stdint-intn.h>", Private, "<stdint.h>", Public),
    entry("<bits/stdint-uintn.h>", Private, "<stdint.h>", Public),
    entry("<bits/wordsize.h>", Private, "<limits.h>", Public),
    entry("<bits/posix1_lim.h>", Private, "<limits.h>", Public),
    entry("<bits/local_lim.h>", Private, "<limits.h>", Public),
    entry("<bits/errno.h>", Private, "<errno.h>", Public),
    entry("<bits/fcntl.h>", Private, "<fcntl.h>", Public),
    entry("<bits/stat.h>", Private, "<sys/stat.h>", Public),
    entry("<bits/signum.h>", Private, "<signal.h>", Public),
    entry("<bits/sigaction.h>", Private, "<signal.h>", Public),
    entry("<bits/sigset.h>", Private, "<signal.h>", Public),
    entry("<bits/time.h>", Private, "<time.h>", Public),
    entry("<bits/types/struct_timespec.h>", Private, "<time.h>", Public),
    entry("<bits/types/struct_timeval.h>", Private, "<sys/time.h>", Public),
    entry("<bits/types/FILE.h>", Private, "<stdio.h>", Public),
    entry("<bits/stdio.h>", Private, "<stdio.h>", Public),
    entry("<bits/string.h>", Private, "<string.h>", Public),
    entry("<bits/pthreadtypes.h>", Private, "<pthread.h>", Public),
    entry("<bits/socket.h>", Private, "<sys/socket.h>", Public),
    entry("<bits/in.h>", Private, "<netinet/in.h>", Public),
    entry("<bits/mman.h>", Private, "<sys/mman.h>", Public),
    entry("<bits/dirent.h>", Private, "<dirent.h>", Public),
    entry("<bits/confname.h>", Private, "<unistd.h>", Public),
    entry("<bits/environments.h>", Private, "<unistd.h>", Public),
    entry("<bits/byteswap.h>", Private, "<byteswap.h>", Public),
    entry("<bits/endian.h>", Private, "<endian.h>", Public),
    entry("<bits/select.h>", Private, "<sys/select.h>", Public),
    entry("<bits/ioctls.h>", Private, "<sys/ioctl.h>", Public),
    entry("<bits/mathcalls.h>", Private, "<math.h>", Public),
    entry("<bits/setjmp.h>", Private, "<setjmp.h>", Public),
    entry("<stdarg.h>", Public, "<cstdarg>", Public),
    entry("<stddef.h>", Public, "<cstddef>", Public),
    entry("<stdint.h>", Public, "<cstdint>", Public),
    entry("<stdio.h>", Public, "<cstdio>", Public),
    entry("<stdlib.h>", Public, "<cstdlib>", Public),
    entry("<string.h>", Public, "<cstring>", Public),
    entry("<math.h>", Public, "<cmath>", Public),
    entry("<limits.h>", Public, "<climits>", Public),
    entry("<assert.h>", Public, "<cassert>", Public),
    entry("<ctype.h>", Public, "<cctype>", Public),
    entry("<errno.h>", Public, "<cerrno>", Public),
    entry("<time.h>", Public, "<ctime>", Public),
    entry("<signal.h>", Public, "<csignal>", Public),
    entry("<setjmp.h>", Public, "<csetjmp>", Public),
];

/// FreeBSD machine-dependent headers. `x86/*` headers map to `machine/*`
/// or standard headers, `machine/*` to `sys/*` or standard headers.
pub const FREEBSD_INCLUDE_MAP: &[BuiltinEntry] = &[
    entry("<x86/_align.h>", Private, "<sys/param.h>", Public),
    entry("<x86/apicvar.h>", Private, "<machine/smp.h>", Public),
    entry("<x86/bus.h>", Private, "<machine/bus.h>", Public),
    entry("<x86/cputypes.h>", Private, "<machine/cputypes.h>", Public),
    entry("<x86/elf.h>", Private, "<elf.h>", Public),
    entry("<x86/endian.h>", Private, "<endian.h>", Public),
    entry("<x86/float.h>", Private, "<float.h>", Public),
    entry("<x86/fpu.h>", Private, "<machine/fpu.h>", Public),
    entry("<x86/fpu.h>", Private, "<machine/npx.h>", Public),
    entry("<x86/_inttypes.h>", Private, "<inttypes.h>", Public),
    entry("<x86/_limits.h>", Private, "<sys/limits.h>", Public),
    entry("<x86/psl.h>", Private, "<machine/psl.h>", Public),
    entry("<x86/segments.h>", Private, "<machine/segments.h>", Public),
    entry("<x86/setjmp.h>", Private, "<setjmp.h>", Public),
    entry("<x86/signal.h>", Private, "<sys/signal.h>", Public),
    entry("<x86/specialreg.h>", Private, "<machine/specialreg.h>", Public),
    entry("<x86/stdarg.h>", Private, "<stdarg.h>", Public),
    entry("<x86/_stdint.h>", Private, "<stdint.h>", Public),
    entry("<x86/_types.h>", Private, "<machine/_types.h>", Private),
    entry("<x86/ucontext.h>", Private, "<ucontext.h>", Public),
    entry("<machine/_align.h>", Private, "<sys/param.h>", Public),
    entry("<machine/atomic.h>", Private, "<sys/mutex.h>", Public),
    entry("<machine/_bus.h>", Private, "<machine/bus.h>", Public),
    entry("<machine/_bus.h>", Private, "<sys/bus.h>", Public),
    entry("<machine/counter.h>", Private, "<sys/counter.h>", Public),
    entry("<machine/cpufunc.h>", Private, "<sys/mutex.h>", Public),
    entry("<machine/elf.h>", Private, "<elf.h>", Public),
    entry("<machine/endian.h>", Private, "<sys/endian.h>", Public),
    entry("<machine/exec.h>", Private, "<sys/exec.h>", Public),
    entry("<machine/_inttypes.h>", Private, "<inttypes.h>", Public),
    entry("<machine/_limits.h>", Private, "<sys/limits.h>", Public),
    entry("<machine/signal.h>", Private, "<sys/signal.h>", Public),
    entry("<machine/_stdint.h>", Private, "<stdint.h>", Public),
    entry("<machine/_types.h>", Private, "<sys/_types.h>", Private),
    entry("<sys/_stdint.h>", Private, "<stdint.h>", Public),
    entry("<sys/_types.h>", Private, "<sys/types.h>", Public),
];

/// Symbols whose provider cannot be derived from a declaration: macros and
/// builtin typedefs.
pub const SYMBOL_MAP: &[BuiltinEntry] = &[
    entry("NULL", Private, "<cstddef>", Public),
    entry("NULL", Private, "<cstdio>", Public),
    entry("NULL", Private, "<cstring>", Public),
    entry("NULL", Private, "<cstdlib>", Public),
    entry("size_t", Private, "<cstddef>", Public),
    entry("ptrdiff_t", Private, "<cstddef>", Public),
    entry("offsetof", Private, "<cstddef>", Public),
    entry("va_list", Private, "<cstdarg>", Public),
    entry("errno", Private, "<cerrno>", Public),
    entry("EOF", Private, "<cstdio>", Public),
    entry("std::size_t", Private, "<cstddef>", Public),
    entry("std::nullptr_t", Private, "<cstddef>", Public),
    entry("std::allocator", Private, "<memory>", Public),
    entry("std::char_traits", Private, "<string>", Public),
    entry("std::swap", Private, "<utility>", Public),
    entry("std::move", Private, "<utility>", Public),
    entry("std::forward", Private, "<utility>", Public),
];

/// All built-in include tables in priority order.
pub fn include_tables() -> [&'static [BuiltinEntry]; 3] {
    [LIBSTDCPP_INCLUDE_MAP, LIBC_INCLUDE_MAP, FREEBSD_INCLUDE_MAP]
}
